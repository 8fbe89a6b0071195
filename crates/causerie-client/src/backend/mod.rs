//! Backing-store access.
//!
//! The synchronization core treats persistence as an opaque, ordered,
//! append-only store reachable by range query and insert.  Two
//! implementations are provided: [`RestBackend`] speaks to the hosted
//! service over HTTP, [`LocalBackend`] wraps the embedded SQLite store for
//! standalone use and tests.

pub mod local;
pub mod rest;

use thiserror::Error;

use causerie_shared::types::StoredMessage;

pub use local::LocalBackend;
pub use rest::RestBackend;

/// Errors crossing the persistence boundary.
///
/// A failed call is always an error value, distinct from a successful empty
/// result.
#[derive(Error, Debug)]
pub enum BackendError {
    /// A range read failed.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// An append failed.
    #[error("Insert failed: {0}")]
    Insert(String),
}

/// Contract of the backing store.
#[allow(async_fn_in_trait)]
pub trait MessageBackend {
    /// Read rows `[offset, offset + limit)` of the reverse-chronological
    /// ordering (newest first).
    async fn select_page(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, BackendError>;

    /// Append one row.  The store assigns row identity; no uniqueness
    /// constraint is assumed.
    async fn insert(&self, message: &StoredMessage) -> Result<(), BackendError>;
}
