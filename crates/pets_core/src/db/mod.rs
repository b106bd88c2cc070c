//! Pet catalog storage: connection bootstrap, schema versions and the
//! lazily opened `PetDbHelper`.
//!
//! A connection leaves this module only after the `pets` table has been
//! migrated to `migrations::latest_version()` (tracked in `PRAGMA user_version`).

use std::error::Error;
use std::fmt::{Display, Formatter};

mod helper;
pub mod migrations;
mod open;

pub use helper::{DbLocation, PetDbHelper};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage bootstrap failure.
#[derive(Debug)]
pub enum DbError {
    /// SQLite could not open the database at `target` (a path or `memory`).
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// The pets file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Statement failure on an open connection.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open pets database at {target}: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "pets database is at schema version {db_version}, this build reads up to {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Sqlite(source) => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
