//! Repository layer over the `pets` table.
//!
//! # Responsibility
//! - Translate typed projections, selections and value maps into SQL.
//! - Isolate SQLite statement details from the resource router.
//!
//! # Invariants
//! - Column names in generated SQL come only from `PetColumn`.
//! - Caller-provided selection clauses are always bound, never interpolated
//!   with values.

pub mod pet_repo;
