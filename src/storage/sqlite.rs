//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Store trait and
//! the exclusive transactions used by reconciliation.

use crate::model::{parse_timestamp, LedgerEntry, Record};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StorageResult, Store};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

/// Columns selected for every item read, in `record_from_row` order
const ITEM_COLUMNS: &str =
    "identity, created_at, rank, title, byline, link, review, price, image, synopsis";

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `lock_timeout` - How long to wait for a concurrent exclusive
    ///   transaction to finish before failing
    pub fn open(path: &Path, lock_timeout: Duration) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        conn.busy_timeout(lock_timeout)?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Starts a transaction that holds the database write lock until it ends
    ///
    /// Blocks for up to the configured lock timeout while another exclusive
    /// transaction is open. Dropping the transaction without committing rolls
    /// it back.
    pub fn begin_exclusive(&mut self) -> StorageResult<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Exclusive)?)
    }
}

impl Store for SqliteStore {
    fn load_items(&self) -> StorageResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM items ORDER BY created_at DESC",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map([], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} items", items.len());
        Ok(items)
    }

    fn stored_identities(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT identity FROM items")?;
        let identities = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(identities)
    }

    fn load_history(&self) -> StorageResult<Vec<LedgerEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT identity, retired_at FROM history ORDER BY retired_at DESC")?;

        let entries = stmt
            .query_map([], |row| {
                Ok(LedgerEntry {
                    identity: row.get(0)?,
                    retired_at: timestamp_column(row, 1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn is_retired(&self, identity: &str) -> StorageResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM history WHERE identity = ?1",
                params![identity],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn count_items(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_history(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Maps an `ITEM_COLUMNS` row to a record
///
/// Display columns may be NULL when rows were written by other tools; they
/// read back as empty strings.
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };

    Ok(Record {
        identity: row.get(0)?,
        created_at: timestamp_column(row, 1)?,
        rank: text(2)?,
        title: text(3)?,
        byline: text(4)?,
        link: text(5)?,
        review: text(6)?,
        price: text(7)?,
        image: text(8)?,
        synopsis: text(9)?,
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    let value: String = row.get(idx)?;
    parse_timestamp(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid timestamp '{}'", value).into(),
        )
    })
}
