//! In-process TTL cache store.

use super::store::{CacheError, CacheResult, CacheStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-memory cache store for single-process deployments and tests.
///
/// Expired entries read as misses and are dropped on the next access to
/// their key or by [`InMemoryCacheStore::purge_expired`].
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
}

fn deadline(ttl: Duration) -> CacheResult<Instant> {
    Instant::now()
        .checked_add(ttl)
        .ok_or_else(|| CacheError::Operation(format!("TTL of {}s is out of range", ttl.as_secs())))
}

impl InMemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!("Purged {} expired cache entries", purged);
        }
        purged
    }

    /// Number of stored entries, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // expired: drop it unless a concurrent set replaced it
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: deadline(ttl)?,
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    async fn set_many(&self, batch: &HashMap<String, String>, ttl: Duration) -> CacheResult<()> {
        let expires_at = deadline(ttl)?;
        let mut entries = self.entries.write();
        for (key, value) in batch {
            entries.insert(
                key.clone(),
                Entry {
                    value: value.clone(),
                    expires_at,
                },
            );
        }
        debug!("Cached batch of {} keys", batch.len());
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .write()
            .remove(key)
            .is_some_and(|entry| entry.is_live(now)))
    }

    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}
