//! Crawl orchestration
//!
//! Walks the configured listing pages in order, enriches every entry with its
//! detail page, and stamps surviving records with synthetic creation times:
//! - A failed listing page contributes no records
//! - An entry whose detail page fails or lacks an identity is dropped
//! - Earlier (better ranked) records get later timestamps

use crate::config::{Config, SourceConfig};
use crate::crawler::detail::{extract_detail, DetailInfo};
use crate::crawler::fetcher::{DocumentSource, HttpFetcher};
use crate::crawler::listing::{extract_listing, ListingEntry};
use crate::crawler::retry::RetryingFetcher;
use crate::model::Record;
use chrono::{DateTime, Duration, Utc};
use url::Url;

/// Gap between the synthetic timestamps of consecutive records
pub const TIMESTAMP_STEP_SECS: i64 = 1;

/// Running timestamp accumulator for one crawl run
///
/// Starts at the run's `now` and hands out strictly decreasing timestamps.
#[derive(Debug, Clone)]
pub struct TimestampCursor {
    start: DateTime<Utc>,
    offset: Duration,
    step: Duration,
}

impl TimestampCursor {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            offset: Duration::zero(),
            step: Duration::seconds(TIMESTAMP_STEP_SECS),
        }
    }

    /// Returns `start - offset`, then widens the offset by one step
    pub fn advance(&mut self) -> DateTime<Utc> {
        let stamp = self.start - self.offset;
        self.offset = self.offset + self.step;
        stamp
    }
}

/// Crawls the ranked listing into an ordered collection of records
pub struct Crawler<S = HttpFetcher> {
    fetcher: RetryingFetcher<S>,
    source: SourceConfig,
}

impl Crawler<HttpFetcher> {
    /// Creates an HTTP-backed crawler from the full configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self::new(
            fetcher,
            config.source.clone(),
            config.fetch.retry_attempts,
        ))
    }
}

impl<S: DocumentSource> Crawler<S> {
    pub fn new(source: S, source_config: SourceConfig, retry_attempts: u32) -> Self {
        Self {
            fetcher: RetryingFetcher::new(source, retry_attempts),
            source: source_config,
        }
    }

    /// Runs a full crawl, timestamping records from the current time
    pub async fn crawl(&self) -> Vec<Record> {
        self.crawl_from(Utc::now()).await
    }

    /// Runs a full crawl with `now` as the first record's timestamp
    ///
    /// Never fails: unreachable pages and incomplete items are logged and
    /// left out of the result.
    pub async fn crawl_from(&self, now: DateTime<Utc>) -> Vec<Record> {
        let mut cursor = TimestampCursor::new(now);
        let mut records = Vec::new();

        for page in 1..=self.source.pages {
            let entries = self.crawl_page(page).await;
            tracing::info!("Page {} listed {} entries", page, entries.len());

            for entry in entries {
                let Some(detail) = self.fetch_detail(&entry).await else {
                    continue;
                };
                tracing::debug!("Crawled {} ({})", detail.identity, entry.title);
                records.push(into_record(entry, detail, cursor.advance()));
            }
        }

        tracing::info!("Crawl produced {} records", records.len());
        records
    }

    /// Fetches and extracts one listing page
    async fn crawl_page(&self, page: u32) -> Vec<ListingEntry> {
        let page_url = self.source.page_url(page);
        tracing::info!("Crawling page {}: {}", page, page_url);

        let url = match Url::parse(&page_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping page {}: invalid URL {}: {}", page, page_url, e);
                return Vec::new();
            }
        };

        match self.fetcher.fetch(&page_url).await {
            Some(body) => extract_listing(&body, &url),
            None => {
                tracing::warn!("Skipping page {}: listing could not be fetched", page);
                Vec::new()
            }
        }
    }

    /// Fetches and extracts the detail page of one entry
    async fn fetch_detail(&self, entry: &ListingEntry) -> Option<DetailInfo> {
        if entry.link.is_empty() {
            tracing::warn!("Dropping '{}': no detail link", entry.title);
            return None;
        }

        let Some(body) = self.fetcher.fetch(&entry.link).await else {
            tracing::warn!("Dropping '{}': detail page unavailable", entry.title);
            return None;
        };

        let detail = extract_detail(&body, self.source.synopsis_limit);
        if detail.is_none() {
            tracing::warn!(
                "Dropping '{}': no identity found at {}",
                entry.title,
                entry.link
            );
        }
        detail
    }
}

fn into_record(entry: ListingEntry, detail: DetailInfo, created_at: DateTime<Utc>) -> Record {
    Record {
        identity: detail.identity,
        rank: entry.rank,
        title: entry.title,
        byline: entry.byline,
        link: entry.link,
        review: entry.review,
        price: entry.price,
        image: entry.image,
        synopsis: detail.synopsis,
        created_at,
    }
}
