//! Pets resource router.
//!
//! # Responsibility
//! - Resolve content URIs through an immutable routing table.
//! - Validate write values and dispatch CRUD to the repository.
//! - Notify overlapping subscribers after writes that changed rows.
//!
//! # Invariants
//! - Item URIs force the selection to `_id = <id>`; caller selections are ignored.
//! - Insert is only supported on the collection URI.
//! - Empty update maps return `0` without opening storage.
//! - The table layout is verified before the first repository call.
//! - Delete/update notify only when the affected count is non-zero.

use super::cursor::PetCursor;
use super::notifier::{ChangeNotifier, ChangeSubscription};
use super::uri::{pet_uri_matcher, PetRoute, PetUri, UriMatcher};
use crate::contract::{content_uri, PetColumn, CONTENT_AUTHORITY, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE};
use crate::db::{DbError, PetDbHelper};
use crate::model::pet::{PetValues, ValidationError, ValidationMode};
use crate::repo::pet_repo::{RepoError, Selection, SortOrder, SqlitePetRepository};
use rusqlite::Connection;
use log::{debug, info, warn};
use once_cell::unsync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Error returned by router operations.
#[derive(Debug)]
pub enum ProviderError {
    /// URI does not match a registered shape for this operation.
    UnsupportedResource {
        operation: &'static str,
        uri: String,
    },
    /// Values failed field validation; storage was not touched.
    InvalidArgument(ValidationError),
    /// Database could not be opened or bootstrapped.
    StorageUnavailable(DbError),
    /// Storage rejected the inserted row.
    InsertFailed { uri: String, source: RepoError },
    /// Any other storage failure (malformed selection, constraint, I/O).
    Storage(RepoError),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedResource { operation, uri } => {
                write!(f, "{operation} is not supported for uri `{uri}`")
            }
            Self::InvalidArgument(err) => write!(f, "invalid argument: {err}"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::InsertFailed { uri, source } => {
                write!(f, "failed to insert row for `{uri}`: {source}")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnsupportedResource { .. } => None,
            Self::InvalidArgument(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            Self::InsertFailed { source, .. } => Some(source),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ProviderError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidArgument(value)
    }
}

impl From<RepoError> for ProviderError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Content-provider style router over the pets table.
pub struct PetProvider {
    authority: String,
    matcher: UriMatcher<PetRoute>,
    db: PetDbHelper,
    notifier: ChangeNotifier,
    schema_checked: OnceCell<()>,
}

impl PetProvider {
    /// Router for the default pets authority.
    pub fn new(db: PetDbHelper) -> Self {
        Self::with_authority(db, CONTENT_AUTHORITY)
    }

    /// Router answering for a custom authority.
    pub fn with_authority(db: PetDbHelper, authority: impl Into<String>) -> Self {
        let authority = authority.into();
        Self {
            matcher: pet_uri_matcher(&authority),
            authority,
            db,
            notifier: ChangeNotifier::new(),
            schema_checked: OnceCell::new(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Collection URI under this router's authority.
    pub fn content_uri(&self) -> String {
        content_uri(&self.authority)
    }

    /// URI string for one resource under this router's authority.
    pub fn uri_for(&self, uri: PetUri) -> String {
        uri.to_uri_string(&self.authority)
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Resolves `uri` to a pets resource, or `None` when it is unsupported.
    pub fn match_uri(&self, uri: &str) -> Option<PetUri> {
        let matched = self.matcher.match_uri(uri)?;
        match matched.code {
            PetRoute::Pets => Some(PetUri::Collection),
            PetRoute::PetId => matched.last_id().map(PetUri::Item),
        }
    }

    /// Returns the MIME type of `uri`.
    pub fn get_type(&self, uri: &str) -> ProviderResult<&'static str> {
        match self.resolve("get_type", uri)? {
            PetUri::Collection => Ok(CONTENT_LIST_TYPE),
            PetUri::Item(_) => Ok(CONTENT_ITEM_TYPE),
        }
    }

    /// Subscribes to changes on `uri` without running a query.
    pub fn subscribe(&self, uri: &str) -> ProviderResult<ChangeSubscription> {
        let resource = self.resolve("subscribe", uri)?;
        Ok(self.notifier.subscribe(resource))
    }

    /// Signals subscribers overlapping `uri`; returns how many were reached.
    pub fn notify(&self, uri: PetUri) -> usize {
        self.notifier.notify(uri)
    }

    /// Runs a projected query and returns a live cursor.
    ///
    /// An empty `projection` selects every column. For item URIs the
    /// selection is replaced by `_id = <id>`.
    ///
    /// # Errors
    /// - `UnsupportedResource` for unknown URIs.
    /// - `StorageUnavailable` when the database cannot be opened.
    /// - `Storage` when the statement cannot be prepared.
    pub fn query(
        &self,
        uri: &str,
        projection: &[PetColumn],
        selection: &Selection,
        sort: &SortOrder,
    ) -> ProviderResult<PetCursor<'_>> {
        let resource = self.resolve("query", uri)?;
        let selection = scoped_selection(resource, selection);

        let prepared = self
            .reader()?
            .prepare_query(projection, &selection, sort)?;
        debug!("event=pet_query module=provider status=ok uri={resource}");

        Ok(PetCursor::new(prepared, self.notifier.subscribe(resource)))
    }

    /// Inserts one pet and returns its item resource.
    ///
    /// # Errors
    /// - `UnsupportedResource` unless `uri` is the collection URI.
    /// - `InvalidArgument` when `values` fail insert validation.
    /// - `StorageUnavailable` when the database cannot be opened.
    /// - `InsertFailed` when storage rejects the row.
    pub fn insert(&self, uri: &str, values: &PetValues) -> ProviderResult<PetUri> {
        match self.resolve("insert", uri)? {
            PetUri::Collection => {}
            PetUri::Item(_) => return Err(unsupported("insert", uri)),
        }
        values.validate(ValidationMode::Insert)?;

        let id = match self.writer()?.insert(values) {
            Ok(id) => id,
            Err(err) => {
                warn!(
                    "event=pet_insert module=provider status=error uri={} error={}",
                    PetUri::Collection,
                    err
                );
                return Err(ProviderError::InsertFailed {
                    uri: uri.to_string(),
                    source: err,
                });
            }
        };

        let inserted = PetUri::Item(id);
        info!("event=pet_insert module=provider status=ok uri={inserted}");
        self.notifier.notify(PetUri::Collection);
        Ok(inserted)
    }

    /// Deletes matching pets and returns the deleted count.
    ///
    /// An empty selection on the collection URI deletes every row.
    pub fn delete(&self, uri: &str, selection: &Selection) -> ProviderResult<usize> {
        let resource = self.resolve("delete", uri)?;
        let selection = scoped_selection(resource, selection);

        let deleted = self.writer()?.delete(&selection)?;
        info!("event=pet_delete module=provider status=ok uri={resource} rows={deleted}");

        if deleted > 0 {
            self.notifier.notify(resource);
        }
        Ok(deleted)
    }

    /// Updates matching pets with the supplied fields and returns the count.
    ///
    /// Only supplied fields are validated. An empty `values` map returns `0`
    /// without touching storage.
    pub fn update(
        &self,
        uri: &str,
        values: &PetValues,
        selection: &Selection,
    ) -> ProviderResult<usize> {
        values.validate(ValidationMode::Update)?;
        let resource = self.resolve("update", uri)?;
        if values.is_empty() {
            return Ok(0);
        }
        let selection = scoped_selection(resource, selection);

        let updated = self.writer()?.update(values, &selection)?;
        info!("event=pet_update module=provider status=ok uri={resource} rows={updated}");

        if updated > 0 {
            self.notifier.notify(resource);
        }
        Ok(updated)
    }

    fn reader(&self) -> ProviderResult<SqlitePetRepository<'_>> {
        let conn = self
            .db
            .readable_database()
            .map_err(ProviderError::StorageUnavailable)?;
        self.repository(conn)
    }

    fn writer(&self) -> ProviderResult<SqlitePetRepository<'_>> {
        let conn = self
            .db
            .writable_database()
            .map_err(ProviderError::StorageUnavailable)?;
        self.repository(conn)
    }

    // The schema layout is checked once per provider, on first storage access.
    fn repository<'c>(&self, conn: &'c Connection) -> ProviderResult<SqlitePetRepository<'c>> {
        self.schema_checked
            .get_or_try_init(|| SqlitePetRepository::try_new(conn).map(|_| ()))?;
        Ok(SqlitePetRepository::new(conn))
    }

    fn resolve(&self, operation: &'static str, uri: &str) -> ProviderResult<PetUri> {
        self.match_uri(uri).ok_or_else(|| {
            warn!("event=uri_match module=provider status=error operation={operation}");
            unsupported(operation, uri)
        })
    }
}

fn unsupported(operation: &'static str, uri: &str) -> ProviderError {
    ProviderError::UnsupportedResource {
        operation,
        uri: uri.to_string(),
    }
}

fn scoped_selection(resource: PetUri, selection: &Selection) -> Selection {
    match resource {
        PetUri::Collection => selection.clone(),
        PetUri::Item(id) => Selection::by_id(id),
    }
}
