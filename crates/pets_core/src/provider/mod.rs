//! Resource router exposing the pets table through content URIs.
//!
//! # Responsibility
//! - Resolve content URIs to collection/item resources.
//! - Dispatch query/insert/update/delete to the repository.
//! - Publish change notifications after successful writes.
//!
//! # Invariants
//! - The routing table is immutable once the router is constructed.
//! - Writes validate before touching storage.
//! - Observers are notified only when rows were actually affected.

pub mod cursor;
pub mod notifier;
pub mod pet_provider;
pub mod uri;
