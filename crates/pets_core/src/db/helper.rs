//! Lazily opened database handle owner.
//!
//! # Responsibility
//! - Own one database location and the connection opened for it.
//! - Expose readable and writable handles over that connection.
//!
//! # Invariants
//! - The connection is opened on the first handle request, never earlier.
//! - A failed open is not cached; the next request tries again.
//! - Both handle modes share one connection; SQLite serializes writers.

use super::{open_db, open_db_in_memory, DbResult};
use once_cell::unsync::OnceCell;
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Where the pets database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

impl Display for DbLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => write!(f, ":memory:"),
        }
    }
}

/// Owner of the single pets database connection.
pub struct PetDbHelper {
    location: DbLocation,
    conn: OnceCell<Connection>,
}

impl PetDbHelper {
    pub fn new(location: DbLocation) -> Self {
        Self {
            location,
            conn: OnceCell::new(),
        }
    }

    /// Helper backed by a database file at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(DbLocation::File(path.into()))
    }

    /// Helper backed by a private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(DbLocation::Memory)
    }

    pub fn location(&self) -> &DbLocation {
        &self.location
    }

    /// Returns whether the connection has been opened yet.
    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Returns a handle for queries.
    ///
    /// # Errors
    /// - Returns open/bootstrap errors on first access.
    pub fn readable_database(&self) -> DbResult<&Connection> {
        self.connection()
    }

    /// Returns a handle for insert/update/delete.
    ///
    /// # Errors
    /// - Returns open/bootstrap errors on first access.
    pub fn writable_database(&self) -> DbResult<&Connection> {
        self.connection()
    }

    fn connection(&self) -> DbResult<&Connection> {
        self.conn.get_or_try_init(|| match &self.location {
            DbLocation::File(path) => open_db(path),
            DbLocation::Memory => open_db_in_memory(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DbLocation, PetDbHelper};

    #[test]
    fn connection_is_opened_lazily() {
        let helper = PetDbHelper::in_memory();
        assert!(!helper.is_open());

        helper.readable_database().unwrap();
        assert!(helper.is_open());
    }

    #[test]
    fn readable_and_writable_share_one_connection() {
        let helper = PetDbHelper::in_memory();
        helper
            .writable_database()
            .unwrap()
            .execute(
                "INSERT INTO pets (name, breed, gender, weight) VALUES ('a', 'b', 1, 2);",
                [],
            )
            .unwrap();

        let count: i64 = helper
            .readable_database()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM pets;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn unopenable_location_fails_on_every_access() {
        let dir = tempfile::tempdir().unwrap();
        let helper = PetDbHelper::file(dir.path().join("missing").join("pets.db"));

        assert!(helper.readable_database().is_err());
        assert!(helper.writable_database().is_err());
        assert!(!helper.is_open());
    }

    #[test]
    fn location_display_is_stable() {
        assert_eq!(DbLocation::Memory.to_string(), ":memory:");
    }
}
