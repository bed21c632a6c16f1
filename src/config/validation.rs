use crate::config::expected::ExpectedStatusTable;
use crate::config::types::{CacheConfig, Config, DetailConfig, FetcherConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Upper bound for `[cache] ttl-hours` (100 years)
pub const MAX_TTL_HOURS: u64 = 24 * 365 * 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_detail_config(&config.detail)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_cache_config(&config.cache)?;
    validate_output_config(&config.output)?;
    validate_expected_status(&config.expected_status)?;
    Ok(())
}

/// Validates the index location and cell patterns
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.index_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid index-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "index-url '{}' must use http or https",
            config.index_url
        )));
    }

    validate_selector(&config.index_container)?;
    validate_pattern(&config.key_pattern)?;
    validate_pattern(&config.number_pattern)?;

    if config.key_prefix_len > 2 {
        return Err(ConfigError::Validation(format!(
            "key-prefix-len must be at most 2, got {}",
            config.key_prefix_len
        )));
    }

    Ok(())
}

fn validate_detail_config(config: &DetailConfig) -> Result<(), ConfigError> {
    validate_selector(&config.label_selector)?;

    if config.status_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "status-label cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got timeout-secs={} connect-timeout-secs={}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be between 0 and 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.enabled && config.path.is_empty() {
        return Err(ConfigError::Validation(
            "cache path cannot be empty when the cache is enabled".to_string(),
        ));
    }
    if config.ttl_hours > MAX_TTL_HOURS {
        return Err(ConfigError::Validation(format!(
            "ttl-hours cannot exceed {} (got {})",
            MAX_TTL_HOURS, config.ttl_hours
        )));
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_dir.is_empty() {
        return Err(ConfigError::Validation(
            "results-dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates the expected-status table
///
/// The table must cover the empty category key, keys are at most two
/// characters and every key accepts at least one status.
fn validate_expected_status(table: &ExpectedStatusTable) -> Result<(), ConfigError> {
    if table.is_empty() {
        return Err(ConfigError::Validation(
            "expected-status table cannot be empty".to_string(),
        ));
    }

    if !table.contains_key("") {
        return Err(ConfigError::Validation(
            "expected-status table must define the empty category key \"\"".to_string(),
        ));
    }

    for (key, statuses) in table.iter() {
        if key.chars().count() > 2 {
            return Err(ConfigError::Validation(format!(
                "category key '{}' is longer than 2 characters",
                key
            )));
        }

        if statuses.is_empty() || statuses.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "category key '{}' must list at least one non-empty status",
                key
            )));
        }
    }

    Ok(())
}

fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

fn validate_pattern(pattern: &str) -> Result<(), ConfigError> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
}
