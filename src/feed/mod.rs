//! Feed output
//!
//! This module handles:
//! - Rendering the current items as an RSS 2.0 document
//! - Summarizing the store's contents for the command line

mod rss;
pub mod stats;

pub use rss::{escape_xml, format_rss, write_rss};
pub use stats::{load_statistics, print_statistics, FeedStatistics};

use crate::config::FeedConfig;
use crate::storage::Store;
use crate::ShelfError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the store's current items as RSS to `out`, in feed order
///
/// Returns the number of items written.
pub fn write_feed<W: Write>(
    store: &dyn Store,
    channel: &FeedConfig,
    out: &mut W,
) -> Result<usize, ShelfError> {
    let items = store.load_items()?;
    tracing::debug!("Rendering {} items", items.len());
    write_rss(channel, &items, out)?;
    Ok(items.len())
}

/// Writes the store's current items as RSS to the file at `output_path`
pub fn export_feed(
    store: &dyn Store,
    channel: &FeedConfig,
    output_path: &Path,
) -> Result<usize, ShelfError> {
    let mut file = File::create(output_path)?;
    write_feed(store, channel, &mut file)
}
