//! Catalog domain model.
//!
//! # Responsibility
//! - Define the flat item record returned by every repository backend.
//! - Define the insert payload and its validation rules.
//!
//! # Invariants
//! - Identifiers are assigned by the storage backend, never by callers.
//! - Items are insert-only; no update or delete path exists.

pub mod item;
