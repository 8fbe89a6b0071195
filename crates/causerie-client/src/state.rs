//! Application state shared with the embedding UI shell.
//!
//! Everything the rendering layer reads lives in an explicit state object
//! passed by reference; there are no ambient singletons.  The message
//! timeline itself is owned by the [`SyncController`](crate::sync::SyncController).

use tracing::info;

use causerie_store::{Database, StoreError};

use crate::composer::Composer;

/// UI-shell state: the persisted dark-mode flag and the composer input.
#[derive(Debug, Default)]
pub struct AppState {
    /// Dark-mode flag, loaded from the preference store at startup and
    /// written back on every toggle.
    pub dark_mode: bool,

    /// Pending input of the send box.
    pub composer: Composer,
}

impl AppState {
    /// Read persisted preferences and start with an empty composer.
    pub fn load(db: &Database) -> Result<Self, StoreError> {
        Ok(Self {
            dark_mode: db.dark_mode()?,
            composer: Composer::new(),
        })
    }

    /// Flip dark mode and persist the new value immediately.
    pub fn toggle_dark_mode(&mut self, db: &Database) -> Result<bool, StoreError> {
        self.dark_mode = !self.dark_mode;
        db.set_dark_mode(self.dark_mode)?;
        info!(enabled = self.dark_mode, "dark mode toggled");
        Ok(self.dark_mode)
    }
}
