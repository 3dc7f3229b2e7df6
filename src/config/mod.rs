//! Configuration module for Shelf-Feed
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use shelf_feed::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("shelf.toml")).unwrap();
//! println!("Crawler will walk {} listing pages", config.source.pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FeedConfig, FetchConfig, SourceConfig, StorageConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
