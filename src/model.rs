//! Item and ledger records shared by the crawler, the reconciler and the feed

use chrono::{DateTime, SecondsFormat, Utc};

/// A single listing item, as crawled or as stored
///
/// `identity` is the only field used to decide whether two records describe
/// the same item; every other field is display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Stable external key taken from the detail page (never empty)
    pub identity: String,

    /// Listing position at crawl time, as displayed by the source
    pub rank: String,

    pub title: String,
    pub byline: String,

    /// Absolute URL of the item's detail page
    pub link: String,

    pub review: String,
    pub price: String,

    /// Full-size image reference
    pub image: String,

    /// Bounded-length excerpt of the item description
    pub synopsis: String,

    /// Synthetic creation time; newer means better ranked
    pub created_at: DateTime<Utc>,
}

/// A retired identity in the history ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub identity: String,
    pub retired_at: DateTime<Utc>,
}

/// Formats a timestamp for storage
///
/// Fixed microsecond precision keeps the lexical order of stored strings
/// equal to their chronological order, which `ORDER BY created_at` relies on.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a stored timestamp back into UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
