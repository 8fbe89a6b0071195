//! Row structs persisted in the local database.
//!
//! `MessageRow` carries the store-assigned integer row id.  The id never
//! crosses the persistence boundary: the client-facing contract hands out
//! [`StoredMessage`] values only, so identity stays opaque to readers.

use serde::{Deserialize, Serialize};

use causerie_shared::types::{StoredMessage, StoredTime};

/// A single row of the `message` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRow {
    /// Store-assigned row id (monotonic, opaque to clients).
    pub id: i64,
    /// Message body.
    pub text: String,
    /// Canonical stored time string.
    pub time: StoredTime,
}

impl MessageRow {
    /// Strip the row id and return the client-facing message value.
    pub fn into_stored(self) -> StoredMessage {
        StoredMessage {
            text: self.text,
            time: self.time,
        }
    }
}
