//! Core pet catalog logic.
//! This crate owns the pets schema, its write-time invariants and the
//! content-URI router every caller goes through.

pub mod config;
pub mod contract;
pub mod db;
pub mod logging;
pub mod model;
pub mod provider;
pub mod repo;
pub mod service;

pub use crate::config::{ConfigError, PetStoreConfig};
pub use contract::{is_gender_valid, Gender, PetColumn};
pub use db::{DbError, DbLocation, PetDbHelper};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::pet::{
    Pet, PetField, PetId, PetRow, PetValues, ValidationError, ValidationMode,
};
pub use provider::cursor::PetCursor;
pub use provider::notifier::{ChangeNotifier, ChangeSubscription};
pub use provider::pet_provider::{PetProvider, ProviderError, ProviderResult};
pub use provider::uri::{PetUri, UriMatcher};
pub use repo::pet_repo::{
    PetRows, PreparedQuery, RepoError, RepoResult, Selection, SortDirection, SortOrder,
    SqlitePetRepository,
};
pub use service::catalog_service::{CatalogEntry, CatalogService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
