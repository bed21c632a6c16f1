//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during a run, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests for index and detail pages
//! - Retry logic for transient failures
//! - Error classification
//!
//! The rest of the pipeline only sees the `PageFetcher` trait, so every
//! failure below collapses into a `FetchError` the caller logs and skips.

use crate::config::FetcherConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure for a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status_code} for {url}")]
    Http { url: String, status_code: u16 },

    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// Returns true for failures worth another attempt (5xx and timeouts)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { status_code, .. } => *status_code >= 500,
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

/// Source of page content
///
/// Implementations report every transport failure as a `FetchError`
/// instead of panicking or retrying past the caller's control.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetches `url` and returns the page body
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` backed by reqwest
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx, HTML | Return body |
/// | HTTP 4xx | Immediate failure |
/// | HTTP 5xx | Retry up to `max-retries` times |
/// | Timeout | Retry up to `max-retries` times |
/// | Connection refused | Immediate failure |
/// | Non-HTML Content-Type | Immediate failure |
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            client,
            max_retries,
            retry_delay,
        }
    }

    /// Builds the client and retry policy from configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::new(
            client,
            config.max_retries,
            Duration::from_millis(config.retry_delay_ms),
        ))
    }

    /// Performs a single GET without retries
    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        // A missing Content-Type is tolerated; an explicit non-HTML one is not
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.is_empty() && !content_type.contains("html") {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(url, e))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "{} (attempt {}/{}), retrying in {:?}",
                        e,
                        attempt,
                        self.max_retries + 1,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_reqwest_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else if let Some(status) = e.status().filter(|s| *s != StatusCode::OK) {
        FetchError::Http {
            url: url.to_string(),
            status_code: status.as_u16(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
