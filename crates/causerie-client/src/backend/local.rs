//! Embedded-store backend.
//!
//! Wraps a [`causerie_store::Database`] behind the [`MessageBackend`]
//! contract.  The connection is guarded by a mutex: the store handle is
//! synchronous and the surrounding shell may hold a second reference for
//! preference reads.

use std::sync::{Arc, Mutex};

use causerie_shared::types::StoredMessage;
use causerie_store::{Database, MessageRow};

use super::{BackendError, MessageBackend};

/// Backend over the local SQLite store.
#[derive(Clone)]
pub struct LocalBackend {
    db: Arc<Mutex<Database>>,
}

impl LocalBackend {
    /// Take exclusive ownership of a database handle.
    pub fn new(db: Database) -> Self {
        Self::from_shared(Arc::new(Mutex::new(db)))
    }

    /// Share an existing database handle with the rest of the application.
    pub fn from_shared(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Clone of the shared handle, for callers that also need preferences.
    pub fn shared(&self) -> Arc<Mutex<Database>> {
        Arc::clone(&self.db)
    }
}

impl MessageBackend for LocalBackend {
    async fn select_page(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, BackendError> {
        let db = self
            .db
            .lock()
            .map_err(|e| BackendError::Fetch(format!("Lock poisoned: {e}")))?;

        let rows = db
            .list_messages_page(limit, offset)
            .map_err(|e| BackendError::Fetch(e.to_string()))?;

        Ok(rows.into_iter().map(MessageRow::into_stored).collect())
    }

    async fn insert(&self, message: &StoredMessage) -> Result<(), BackendError> {
        let db = self
            .db
            .lock()
            .map_err(|e| BackendError::Insert(format!("Lock poisoned: {e}")))?;

        db.insert_message(message)
            .map_err(|e| BackendError::Insert(e.to_string()))
    }
}
