//! In-memory authoritative plant store.

/// Plant record store and its write operations.
pub mod store;
