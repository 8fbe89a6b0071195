//! # causerie-shared
//!
//! Domain types shared between the Causerie client and store crates: the
//! canonical stored-time representation and its codec, the message model,
//! and the constants that both sides of the persistence boundary agree on.

pub mod constants;
pub mod error;
pub mod time;
pub mod types;

pub use error::TimeError;
pub use types::{PendingId, StoredMessage, StoredTime};
