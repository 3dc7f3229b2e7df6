//! Crawler module for harvesting the ranked listing
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching with bounded retry
//! - Listing and detail page extraction
//! - Crawl orchestration and synthetic timestamps

mod coordinator;
mod detail;
mod fetcher;
mod listing;
mod parser;
mod retry;

pub use coordinator::{Crawler, TimestampCursor, TIMESTAMP_STEP_SECS};
pub use detail::{extract_detail, identity_from_line, truncate_synopsis, DetailInfo, IDENTITY_LABEL};
pub use fetcher::{build_http_client, DocumentSource, FetchError, HttpFetcher};
pub use listing::{extract_listing, normalize_image, ListingEntry};
pub use retry::RetryingFetcher;

use crate::config::Config;
use crate::model::Record;
use crate::ShelfError;

/// Crawls the listing described by `config`
///
/// The only error is failing to build the HTTP client; every fetch or
/// extraction failure during the crawl degrades to omitted records.
pub async fn crawl(config: &Config) -> Result<Vec<Record>, ShelfError> {
    let crawler = Crawler::from_config(config)?;
    Ok(crawler.crawl().await)
}
