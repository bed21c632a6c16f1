//! Response cache for fetched pages
//!
//! This module handles:
//! - SQLite cache initialization and schema management
//! - Storing successful page bodies with their fetch time
//! - Serving fresh entries instead of hitting the network
//!
//! Failures are never cached, so a page that failed on one run is fetched
//! again on the next.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{cache_key, SqliteCache};
pub use traits::{CacheError, CacheResult, CachedPage, PageCache};

use crate::crawler::{FetchError, PageFetcher};
use chrono::{Duration, Utc};
use std::sync::{Mutex, PoisonError};

/// Converts a configured TTL in hours, where 0 means entries never expire
///
/// Values too large for a `Duration` also never expire.
pub fn ttl_from_hours(hours: u64) -> Option<Duration> {
    if hours == 0 {
        return None;
    }
    i64::try_from(hours).ok().and_then(Duration::try_hours)
}

/// `PageFetcher` that consults a `PageCache` before delegating to `inner`
pub struct CachedFetcher<F, C> {
    inner: F,
    cache: Mutex<C>,
    ttl: Option<Duration>,
}

impl<F: PageFetcher, C: PageCache> CachedFetcher<F, C> {
    /// Wraps `inner`; entries older than `ttl` are refetched, `None` keeps them forever
    pub fn new(inner: F, cache: C, ttl: Option<Duration>) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
            ttl,
        }
    }

    /// Empties the cache
    pub fn clear(&self) -> CacheResult<usize> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear()
    }

    /// Deletes entries that are already past the TTL
    ///
    /// Does nothing when entries never expire.
    pub fn purge_stale(&self) -> CacheResult<usize> {
        let Some(ttl) = self.ttl else {
            return Ok(0);
        };

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .purge_older_than(Utc::now() - ttl)
    }

    /// Number of pages currently cached
    pub fn cached_pages(&self) -> CacheResult<u64> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry_count()
    }

    fn lookup(&self, url: &str) -> Option<String> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        match cache.get(url) {
            Ok(Some(page)) if !page.is_stale(self.ttl) => Some(page.body),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Cache lookup failed for {}: {}", url, e);
                None
            }
        }
    }

    fn store(&self, url: &str, body: &str) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = cache.put(url, body) {
            tracing::warn!("Failed to cache {}: {}", url, e);
        }
    }
}

impl<F: PageFetcher, C: PageCache> PageFetcher for CachedFetcher<F, C> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if let Some(body) = self.lookup(url) {
            tracing::debug!("Cache hit for {}", url);
            return Ok(body);
        }

        let body = self.inner.fetch(url).await?;
        self.store(url, &body);
        Ok(body)
    }
}
