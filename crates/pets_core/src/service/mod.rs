//! Catalog use-case services.
//!
//! # Responsibility
//! - Offer the catalog screen's actions as plain function calls.
//! - Keep callers on content URIs instead of storage details.

pub mod catalog_service;
