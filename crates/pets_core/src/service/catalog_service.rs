//! Catalog use-case service.
//!
//! # Responsibility
//! - List the catalog with the standard projection.
//! - Insert the sample pet and wipe every entry.
//!
//! # Invariants
//! - Every call goes through `PetProvider`, so validation and change
//!   notification always apply.

use crate::contract::{Gender, PetColumn};
use crate::model::pet::{PetId, PetValues};
use crate::provider::cursor::PetCursor;
use crate::provider::pet_provider::{PetProvider, ProviderResult};
use crate::provider::uri::PetUri;
use crate::repo::pet_repo::{Selection, SortOrder};

/// Projection used by the catalog list.
pub const CATALOG_PROJECTION: [PetColumn; 5] = PetColumn::ALL;

/// One line of the catalog list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: PetId,
    pub name: String,
    pub breed: String,
}

/// Sample record inserted by the "insert dummy data" action.
pub fn dummy_pet() -> PetValues {
    PetValues::new()
        .name("Toto")
        .breed("Terrier")
        .gender(Gender::Male)
        .weight(7)
}

pub struct CatalogService<'p> {
    provider: &'p PetProvider,
}

impl<'p> CatalogService<'p> {
    pub fn new(provider: &'p PetProvider) -> Self {
        Self { provider }
    }

    /// Live cursor over every pet, ordered by id.
    pub fn catalog(&self) -> ProviderResult<PetCursor<'p>> {
        self.provider.query(
            &self.provider.content_uri(),
            &CATALOG_PROJECTION,
            &Selection::all(),
            &SortOrder::none().asc(PetColumn::Id),
        )
    }

    /// Materialized catalog lines.
    pub fn list_entries(&self) -> ProviderResult<Vec<CatalogEntry>> {
        let mut cursor = self.catalog()?;
        let mut entries = Vec::new();
        for row in cursor.rows()? {
            let row = row?;
            let Some(id) = row.id else {
                continue;
            };
            entries.push(CatalogEntry {
                id,
                name: row.name.unwrap_or_default(),
                breed: row.breed.unwrap_or_default(),
            });
        }
        Ok(entries)
    }

    /// Inserts the sample pet and returns its item resource.
    pub fn insert_dummy_pet(&self) -> ProviderResult<PetUri> {
        self.provider
            .insert(&self.provider.content_uri(), &dummy_pet())
    }

    /// Deletes every pet and returns how many were removed.
    pub fn delete_all(&self) -> ProviderResult<usize> {
        self.provider
            .delete(&self.provider.content_uri(), &Selection::all())
    }

    /// URI opened when one entry is selected for editing.
    pub fn entry_uri(&self, id: PetId) -> String {
        self.provider.uri_for(PetUri::Item(id))
    }
}
