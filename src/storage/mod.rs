//! Storage module for the item store
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Reading current items in feed order
//! - Reading the history ledger
//! - Exclusive transactions for reconciliation

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStore;
pub use traits::{StorageError, StorageResult, Store};

use crate::config::StorageConfig;
use std::path::Path;
use std::time::Duration;

/// Opens the store described by the storage configuration
pub fn open_store(config: &StorageConfig) -> StorageResult<SqliteStore> {
    SqliteStore::open(
        Path::new(&config.database_path),
        Duration::from_secs(config.lock_timeout_secs),
    )
}
