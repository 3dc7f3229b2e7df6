//! Storage traits and error types
//!
//! This module defines the read-side interface of the store and the
//! associated error types.

use crate::model::{LedgerEntry, Record};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Read access to the current items and the history ledger
///
/// Writes happen only through reconciliation, which needs the concrete
/// SQLite transaction.
pub trait Store {
    /// Loads every current item, newest `created_at` first
    fn load_items(&self) -> StorageResult<Vec<Record>>;

    /// Identities of every current item
    fn stored_identities(&self) -> StorageResult<Vec<String>>;

    /// Loads the whole ledger, most recently retired first
    fn load_history(&self) -> StorageResult<Vec<LedgerEntry>>;

    /// Checks whether an identity has ever been retired
    fn is_retired(&self, identity: &str) -> StorageResult<bool>;

    /// Counts current items
    fn count_items(&self) -> StorageResult<u64>;

    /// Counts ledger entries
    fn count_history(&self) -> StorageResult<u64>;
}
