//! Proposal-Audit: a status reconciler for change-proposal indexes
//!
//! This crate reads a documentation site's proposal index, visits every
//! proposal's detail page to read its declared status, counts statuses and
//! cross-checks each one against the statuses expected for its index category.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod model;
pub mod output;

use thiserror::Error;

/// Main error type for Proposal-Audit operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Index page error: {0}")]
    Index(#[from] IndexError),

    #[error("Failed to fetch index page {url}: {source}")]
    IndexFetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("Unknown category key '{key}' for {url}")]
    UnknownCategoryKey { key: String, url: String },

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Structural failures of the index page; these abort a run
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index container '{selector}' not found")]
    MissingContainer { selector: String },
}

/// Result type alias for Proposal-Audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, ExpectedStatusTable};
pub use crawler::{audit, DetailClassifier, IndexExtractor, PageFetcher, Reconciler};
pub use model::{IndexRecord, Mismatch, ReconcileOutcome, StatusCount};
