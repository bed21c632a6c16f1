//! SQLite cache implementation
//!
//! This module provides a SQLite-based implementation of the PageCache trait.

use crate::cache::schema::initialize_schema;
use crate::cache::traits::{CacheError, CacheResult, CachedPage, PageCache};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;

/// SQLite cache backend
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Opens or creates the cache database at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteCache)` - Successfully opened/created database
    /// * `Err(CacheError)` - Failed to open database
    pub fn new(path: &Path) -> CacheResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory cache
    pub fn new_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Cache key for a URL: hex-encoded SHA-256 of the URL string
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fixed-width RFC 3339 so stored timestamps compare correctly as text
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl PageCache for SqliteCache {
    fn get(&self, url: &str) -> CacheResult<Option<CachedPage>> {
        let row = self
            .conn
            .query_row(
                "SELECT url, body, fetched_at FROM responses WHERE key = ?1",
                params![cache_key(url)],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((url, body, fetched_at)) = row else {
            return Ok(None);
        };

        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .map_err(|e| CacheError::Corrupt {
                url: url.clone(),
                message: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(Some(CachedPage {
            url,
            body,
            fetched_at,
        }))
    }

    fn put(&mut self, url: &str, body: &str) -> CacheResult<()> {
        let now = timestamp(Utc::now());
        self.conn.execute(
            "INSERT INTO responses (key, url, body, fetched_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET body = excluded.body, fetched_at = excluded.fetched_at",
            params![cache_key(url), url, body, now],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> CacheResult<usize> {
        let removed = self.conn.execute("DELETE FROM responses", [])?;
        Ok(removed)
    }

    fn entry_count(&self) -> CacheResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn purge_older_than(&mut self, cutoff: DateTime<Utc>) -> CacheResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM responses WHERE fetched_at < ?1",
            params![timestamp(cutoff)],
        )?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_put_and_get() {
        let mut cache = SqliteCache::new_in_memory().unwrap();
        cache
            .put("https://peps.python.org/pep-0001/", "<html>one</html>")
            .unwrap();

        let page = cache.get("https://peps.python.org/pep-0001/").unwrap().unwrap();
        assert_eq!(page.url, "https://peps.python.org/pep-0001/");
        assert_eq!(page.body, "<html>one</html>");
        assert!(page.age() < Duration::minutes(1));
    }

    #[test]
    fn test_get_missing() {
        let cache = SqliteCache::new_in_memory().unwrap();
        assert!(cache.get("https://peps.python.org/").unwrap().is_none());
    }

    #[test]
    fn test_put_replaces_existing_entry() {
        let mut cache = SqliteCache::new_in_memory().unwrap();
        cache.put("https://peps.python.org/", "old").unwrap();
        cache.put("https://peps.python.org/", "new").unwrap();

        assert_eq!(cache.entry_count().unwrap(), 1);
        assert_eq!(cache.get("https://peps.python.org/").unwrap().unwrap().body, "new");
    }

    #[test]
    fn test_clear() {
        let mut cache = SqliteCache::new_in_memory().unwrap();
        cache.put("https://a.example/", "a").unwrap();
        cache.put("https://b.example/", "b").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert_eq!(cache.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_purge_older_than() {
        let mut cache = SqliteCache::new_in_memory().unwrap();
        cache.put("https://a.example/", "a").unwrap();

        assert_eq!(cache.purge_older_than(Utc::now() - Duration::hours(1)).unwrap(), 0);
        assert_eq!(cache.purge_older_than(Utc::now() + Duration::hours(1)).unwrap(), 1);
    }

    #[test]
    fn test_cache_key_is_stable_hex() {
        let key = cache_key("https://peps.python.org/");
        assert_eq!(key, cache_key("https://peps.python.org/"));
        assert_ne!(key, cache_key("https://peps.python.org/pep-0001/"));
        assert_eq!(key.len(), 64);
    }

    #[test]
    fn test_file_backed_cache_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.sqlite");

        {
            let mut cache = SqliteCache::new(&path).unwrap();
            cache.put("https://peps.python.org/", "body").unwrap();
        }

        let cache = SqliteCache::new(&path).unwrap();
        assert_eq!(cache.entry_count().unwrap(), 1);
    }
}
