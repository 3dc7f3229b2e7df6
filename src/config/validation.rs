use crate::config::types::{Config, FeedConfig, FetchConfig, SourceConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

const MAX_PAGES: u32 = 50;
const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_fetch_config(&config.fetch)?;
    validate_storage_config(&config.storage)?;
    validate_feed_config(&config.feed)?;
    Ok(())
}

/// Validates listing source configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;

    if config.pages < 1 || config.pages > MAX_PAGES {
        return Err(ConfigError::Validation(format!(
            "pages must be between 1 and {}, got {}",
            MAX_PAGES, config.pages
        )));
    }

    // A page number appended to a fragment is never sent to the server
    if config.pages > 1 && config.base_url.contains('#') {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' puts the page number in the URL fragment; \
             use a query parameter to walk {} pages",
            config.base_url, config.pages
        )));
    }

    if config.synopsis_limit < 1 {
        return Err(ConfigError::Validation(
            "synopsis_limit must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.retry_attempts > MAX_RETRY_ATTEMPTS {
        return Err(ConfigError::Validation(format!(
            "retry_attempts must be <= {}, got {}",
            MAX_RETRY_ATTEMPTS, config.retry_attempts
        )));
    }

    Ok(())
}

/// Validates store configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_feed_config(config: &FeedConfig) -> Result<(), ConfigError> {
    if config.title.trim().is_empty() {
        return Err(ConfigError::Validation(
            "feed title cannot be empty".to_string(),
        ));
    }

    validate_http_url("feed link", &config.link)
}

/// Checks that a configured URL parses and uses HTTP or HTTPS
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use HTTP or HTTPS",
            field, value
        )));
    }

    Ok(())
}
