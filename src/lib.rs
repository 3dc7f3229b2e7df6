//! Shelf-Feed: a ranked-listing harvester with a retirement ledger
//!
//! This crate crawls a paginated best-seller listing, enriches every entry with
//! its detail page, and reconciles the result against a SQLite store so that a
//! derived RSS feed follows the current ranking without ever re-publishing an
//! item that dropped off the list before.

pub mod config;
pub mod crawler;
pub mod feed;
pub mod model;
pub mod reconcile;
pub mod storage;

use thiserror::Error;

/// Main error type for Shelf-Feed operations
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Shelf-Feed operations
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Crawler;
pub use model::{LedgerEntry, Record};
pub use reconcile::{reconcile, ReconcileReport};
pub use storage::SqliteStore;
