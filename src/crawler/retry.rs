//! Bounded retry around a document source
//!
//! Transport failures are retried immediately, without backoff, until the
//! attempt ceiling is exceeded. HTTP error statuses are not failures at this
//! layer and are never retried.

use crate::crawler::fetcher::DocumentSource;

/// Wraps a [`DocumentSource`] with a fixed retry ceiling
///
/// A fetch makes at most `attempts + 1` requests: the initial one plus
/// `attempts` retries.
#[derive(Debug, Clone)]
pub struct RetryingFetcher<S> {
    source: S,
    attempts: u32,
}

impl<S: DocumentSource> RetryingFetcher<S> {
    pub fn new(source: S, attempts: u32) -> Self {
        Self { source, attempts }
    }

    #[cfg(test)]
    fn source(&self) -> &S {
        &self.source
    }

    /// Fetches `url`, returning `None` once every attempt has failed
    pub async fn fetch(&self, url: &str) -> Option<String> {
        let mut failures = 0;

        loop {
            match self.source.get(url).await {
                Ok(body) => return Some(body),
                Err(e) => {
                    failures += 1;
                    if failures > self.attempts {
                        tracing::warn!("Giving up on {} after {} attempts: {}", url, failures, e);
                        return None;
                    }
                    tracing::debug!(
                        "Attempt {} for {} failed, retrying: {}",
                        failures,
                        url,
                        e
                    );
                }
            }
        }
    }
}
