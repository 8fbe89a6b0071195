use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Canonical stored time = sortable local-time string at the fixed reference
// offset, no zone suffix. Lexicographic order equals chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct StoredTime(pub String);

impl StoredTime {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoredTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message as exchanged with the backing store.
///
/// Row identity belongs to the store and is never exposed here; two rows with
/// equal `text` and `time` are indistinguishable on the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredMessage {
    pub text: String,
    pub time: StoredTime,
}

/// Client-local identity of a message whose write has not been confirmed yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PendingId(pub Uuid);

impl PendingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for PendingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PendingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
