//! Key-value preferences persisted alongside the messages.
//!
//! The UI shell reads its preferences once at startup and writes them back on
//! every change, so the helpers here are deliberately last-write-wins.

use rusqlite::params;

use causerie_shared::constants::DARK_MODE_KEY;

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Read a preference value.  Returns `None` when the key was never set.
    pub fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn().query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a preference value, replacing any previous one.
    pub fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Whether dark mode was enabled on the last run.  Defaults to `false`.
    pub fn dark_mode(&self) -> Result<bool> {
        Ok(self.get_preference(DARK_MODE_KEY)?.as_deref() == Some("true"))
    }

    /// Persist the dark-mode flag as `"true"` / `"false"`.
    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.set_preference(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn unset_preference_is_none() {
        let (_dir, db) = open_test_db();
        assert_eq!(db.get_preference("missing").unwrap(), None);
        assert!(!db.dark_mode().unwrap());
    }

    #[test]
    fn set_then_get_round_trip() {
        let (_dir, db) = open_test_db();

        db.set_preference("greeting", "bonjour").unwrap();
        assert_eq!(
            db.get_preference("greeting").unwrap().as_deref(),
            Some("bonjour")
        );

        // Last write wins.
        db.set_preference("greeting", "salut").unwrap();
        assert_eq!(
            db.get_preference("greeting").unwrap().as_deref(),
            Some("salut")
        );
    }

    #[test]
    fn dark_mode_toggle_persists() {
        let (_dir, db) = open_test_db();

        db.set_dark_mode(true).unwrap();
        assert!(db.dark_mode().unwrap());
        assert_eq!(
            db.get_preference(DARK_MODE_KEY).unwrap().as_deref(),
            Some("true")
        );

        db.set_dark_mode(false).unwrap();
        assert!(!db.dark_mode().unwrap());
    }
}
