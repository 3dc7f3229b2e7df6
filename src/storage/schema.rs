//! Database schema definitions
//!
//! This module contains the SQL schema for the current-items table and the
//! history ledger.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Items currently on the listing
CREATE TABLE IF NOT EXISTS items (
    identity TEXT NOT NULL PRIMARY KEY,
    created_at TEXT NOT NULL,
    rank TEXT,
    title TEXT,
    byline TEXT,
    link TEXT,
    review TEXT,
    price TEXT,
    image TEXT,
    synopsis TEXT
);

CREATE INDEX IF NOT EXISTS idx_items_created_at ON items(created_at);

-- Identities that dropped off the listing; never re-published
CREATE TABLE IF NOT EXISTS history (
    identity TEXT NOT NULL PRIMARY KEY,
    retired_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// Idempotent; also run inside every reconciliation transaction.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
