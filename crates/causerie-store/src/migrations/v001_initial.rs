//! v001 -- Initial schema creation.
//!
//! Creates the `message` table.  Row identity is the store's integer id and
//! never leaves the persistence layer.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS message (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,   -- store-assigned, opaque to clients
    text TEXT NOT NULL,
    time TEXT NOT NULL                        -- canonical stored form, collation-sortable
);

CREATE INDEX IF NOT EXISTS idx_message_time
    ON message(time DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
