//! Cache store contract.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Failure reported by a cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// The backend was reached but the command failed.
    #[error("cache operation failed: {0}")]
    Operation(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// A key-value store with per-entry expiry.
///
/// `get` returns `Ok(None)` for absent and expired keys alike.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the live value for `key`, if any.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Inserts or overwrites `key`. The entry is unreadable once `ttl` elapses.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Inserts every entry with the same TTL. Either the whole batch is
    /// written or an error is returned.
    async fn set_many(&self, entries: &HashMap<String, String>, ttl: Duration) -> CacheResult<()>;

    /// Removes `key`. Returns whether a live entry was removed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> CacheResult<()>;

    /// Whether this store is backed by anything at all.
    fn is_enabled(&self) -> bool;
}

/// Result of a cache read, with failure kept distinct from a miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(String),
    Miss,
    Unavailable,
}

impl CacheLookup {
    #[must_use]
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Convenience methods over any [`CacheStore`].
#[async_trait]
pub trait CacheExt: CacheStore {
    /// Reads `key` as a tri-state lookup. Backend errors are logged here.
    async fn lookup(&self, key: &str) -> CacheLookup {
        match self.get(key).await {
            Ok(Some(value)) => CacheLookup::Hit(value),
            Ok(None) => CacheLookup::Miss,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, treating as unavailable");
                CacheLookup::Unavailable
            }
        }
    }

    /// Writes `key`, logging and discarding any failure.
    async fn set_best_effort(&self, key: &str, value: &str, ttl: Duration) {
        if let Err(e) = self.set(key, value, ttl).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    /// Deletes `key`, logging and discarding any failure.
    async fn delete_best_effort(&self, key: &str) {
        if let Err(e) = self.delete(key).await {
            warn!(key, error = %e, "Cache delete failed");
        }
    }
}

impl<T: CacheStore + ?Sized> CacheExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_is_tri_state() {
        let mut store = MockCacheStore::new();
        store
            .expect_get()
            .withf(|key| key == "hit")
            .returning(|_| Ok(Some("true".to_string())));
        store
            .expect_get()
            .withf(|key| key == "miss")
            .returning(|_| Ok(None));
        store
            .expect_get()
            .withf(|key| key == "down")
            .returning(|_| Err(CacheError::Unavailable("connection refused".to_string())));

        assert_eq!(store.lookup("hit").await, CacheLookup::Hit("true".to_string()));
        assert_eq!(store.lookup("miss").await, CacheLookup::Miss);
        assert_eq!(store.lookup("down").await, CacheLookup::Unavailable);
    }
}
