//! Cache traits and error types
//!
//! This module defines the trait interface for response cache backends and
//! associated error types.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt cache entry for {url}: {message}")]
    Corrupt { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// A cached page body with the time it was fetched
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub url: String,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

impl CachedPage {
    /// Returns the age of the entry
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    /// Checks whether the entry is older than `ttl`; `None` never expires
    pub fn is_stale(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.age() > ttl)
    }
}

/// Trait for response cache backends
pub trait PageCache {
    /// Looks up the entry for `url`
    fn get(&self, url: &str) -> CacheResult<Option<CachedPage>>;

    /// Stores `body` for `url`, replacing any previous entry
    fn put(&mut self, url: &str, body: &str) -> CacheResult<()>;

    /// Removes every entry and returns how many were removed
    fn clear(&mut self) -> CacheResult<usize>;

    /// Number of cached entries
    fn entry_count(&self) -> CacheResult<u64>;

    /// Removes entries fetched before `cutoff`
    fn purge_older_than(&mut self, cutoff: DateTime<Utc>) -> CacheResult<usize>;
}
