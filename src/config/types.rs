use serde::Deserialize;

/// Main configuration structure for Shelf-Feed
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Listing source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Listing URL template; the page number is appended verbatim
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of listing pages to walk, starting at 1
    pub pages: u32,

    /// Maximum synopsis length in characters
    #[serde(rename = "synopsis-limit", default = "default_synopsis_limit")]
    pub synopsis_limit: usize,
}

impl SourceConfig {
    /// Builds the URL of a single listing page
    ///
    /// When `base_url` ends inside a fragment (`...#`), the page number is
    /// never sent to the server and every page fetches the first one, so
    /// validation only accepts such a base with `pages = 1`.
    pub fn page_url(&self, page: u32) -> String {
        format!("{}{}", self.base_url, page)
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-attempt request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Additional attempts after the first transport failure
    #[serde(rename = "retry-attempts")]
    pub retry_attempts: u32,
}

/// Store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// How long a reconciliation waits for a concurrent one to finish before
    /// failing (seconds)
    #[serde(rename = "lock-timeout-secs", default = "default_lock_timeout_secs")]
    pub lock_timeout_secs: u64,
}

/// RSS channel metadata
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_title")]
    pub title: String,

    #[serde(default = "default_feed_link")]
    pub link: String,

    #[serde(default = "default_feed_title")]
    pub description: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: default_feed_title(),
            link: default_feed_link(),
            description: default_feed_title(),
        }
    }
}

fn default_synopsis_limit() -> usize {
    128
}

fn default_lock_timeout_secs() -> u64 {
    30
}

fn default_feed_title() -> String {
    "Amazon Top Free Kindle Books".to_string()
}

fn default_feed_link() -> String {
    "http://localhost:5000/books".to_string()
}
