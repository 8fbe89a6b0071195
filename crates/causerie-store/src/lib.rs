//! # causerie-store
//!
//! Embedded SQLite rendition of the Causerie backing store.
//!
//! The hosted deployment talks to an externally managed service; this crate
//! provides the same contract on a local database file so the client can run
//! standalone and the synchronization core can be tested hermetically.  The
//! crate exposes a synchronous [`Database`] handle that wraps a
//! [`rusqlite::Connection`] and provides typed helpers for the `message`
//! table and the `preferences` key-value table.

pub mod database;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod preferences;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
