//! Live query result returned by the router.

use super::notifier::ChangeSubscription;
use super::uri::PetUri;
use crate::contract::PetColumn;
use crate::model::pet::{Pet, PetRow};
use crate::repo::pet_repo::{PetRows, PreparedQuery, RepoResult};

/// Lazy query result bound to a change subscription.
///
/// Rows are pulled from storage only while iterating. When
/// [`PetCursor::has_changed`] reports `true`, iterate again to see the
/// latest rows.
pub struct PetCursor<'conn> {
    query: PreparedQuery<'conn>,
    subscription: ChangeSubscription,
}

impl<'conn> PetCursor<'conn> {
    pub(crate) fn new(query: PreparedQuery<'conn>, subscription: ChangeSubscription) -> Self {
        Self {
            query,
            subscription,
        }
    }

    pub fn projection(&self) -> &[PetColumn] {
        self.query.projection()
    }

    /// Resource whose writes invalidate this cursor.
    pub fn notification_uri(&self) -> PetUri {
        self.subscription.uri()
    }

    /// Drains pending change signals; `true` means the rows are stale.
    pub fn has_changed(&self) -> bool {
        self.subscription.take_changed()
    }

    pub fn subscription(&self) -> &ChangeSubscription {
        &self.subscription
    }

    /// Runs the query and returns a lazy row iterator.
    pub fn rows(&mut self) -> RepoResult<PetRows<'_>> {
        self.query.rows()
    }

    pub fn collect_rows(&mut self) -> RepoResult<Vec<PetRow>> {
        self.query.collect_rows()
    }

    /// Collects full records; requires a projection covering every column.
    pub fn collect_pets(&mut self) -> RepoResult<Vec<Pet>> {
        self.query.collect_pets()
    }
}
