//! Range reads and appends on the `message` table.

use rusqlite::params;

use causerie_shared::types::{StoredMessage, StoredTime};

use crate::database::Database;
use crate::error::Result;
use crate::models::MessageRow;

impl Database {
    /// Append one message.  The store assigns the row id.
    pub fn insert_message(&self, message: &StoredMessage) -> Result<()> {
        self.conn().execute(
            "INSERT INTO message (text, time) VALUES (?1, ?2)",
            params![message.text, message.time.as_str()],
        )?;
        Ok(())
    }

    /// Read one page of history, newest first.
    ///
    /// Rows are ordered by `time` descending with the row id as tiebreak, so
    /// a given `(limit, offset)` window is deterministic even when several
    /// messages share a timestamp.
    pub fn list_messages_page(&self, limit: u32, offset: u64) -> Result<Vec<MessageRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, text, time
             FROM message
             ORDER BY time DESC, id DESC
             LIMIT ?1 OFFSET ?2",
        )?;

        let rows = stmt.query_map(params![limit, offset], row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// Total number of stored messages.
    pub fn count_messages(&self) -> Result<u64> {
        let count: u64 =
            self.conn()
                .query_row("SELECT COUNT(*) FROM message", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Map a `rusqlite::Row` to a [`MessageRow`].
fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        text: row.get(1)?,
        time: StoredTime(row.get(2)?),
    })
}
