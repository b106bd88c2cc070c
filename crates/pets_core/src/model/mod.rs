//! Pet catalog domain model.
//!
//! # Responsibility
//! - Define the persisted pet record and its projected row shape.
//! - Define the partial field map used for writes and its validation rules.
//!
//! # Invariants
//! - Every write path validates `PetValues` before touching storage.
//! - Read paths never re-validate stored rows.

pub mod pet;
