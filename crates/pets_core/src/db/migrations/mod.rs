//! Versioned schema for the pets table.
//!
//! Each step is one SQL file; its number is written to `PRAGMA user_version`
//! in the same transaction, so a file is either fully at a step or untouched.

use crate::db::{DbError, DbResult};
use log::debug;
use rusqlite::Connection;

/// `(user_version, sql)` pairs, ascending.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |&(version, _)| version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Sqlite` when a step fails; the transaction is rolled back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let on_disk: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    if on_disk > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: on_disk,
            latest_supported: latest,
        });
    }

    let pending: Vec<_> = SCHEMA_STEPS
        .iter()
        .filter(|&&(version, _)| version > on_disk)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &(version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        debug!("event=db_migrate module=db status=ok from={on_disk} to={version}");
    }
    tx.commit()?;
    Ok(())
}
