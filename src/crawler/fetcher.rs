//! HTTP document fetcher
//!
//! This module performs the single GET behind every listing and detail
//! request:
//! - Builds the HTTP client with the configured user agent and timeout
//! - Follows redirects
//! - Returns the body of non-2xx responses instead of failing
//! - Classifies transport failures (timeout, connect, other)

use crate::config::FetchConfig;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Transport-level failure of a single fetch attempt
///
/// HTTP status codes never produce a `FetchError`; only failures to obtain a
/// response body do.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    fn classify(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Connect {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Anything that can turn a URL into a document body
pub trait DocumentSource {
    /// Performs one attempt at fetching `url`
    fn get(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Builds an HTTP client with the configured identity and timeout
///
/// # Example
///
/// ```no_run
/// use shelf_feed::config::FetchConfig;
/// use shelf_feed::crawler::build_http_client;
///
/// let config = FetchConfig {
///     user_agent: "Mozilla/5.0 Chrome/26.0.1410.64 Safari/537.31".to_string(),
///     timeout_secs: 10,
///     retry_attempts: 3,
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches documents over HTTP, one attempt per call
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

impl DocumentSource for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered {}, keeping body", url, status);
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::classify(url, e))
    }
}
