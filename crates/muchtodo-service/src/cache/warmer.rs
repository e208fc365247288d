//! Startup preload of username markers.

use super::keys::{self, MARKER_VALUE, USERNAME_CACHE_SENTINEL};
use super::store::{CacheLookup, CacheExt, CacheStore};
use muchtodo_repository::UserRepository;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// What a warm attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmOutcome {
    /// Caching is switched off.
    Disabled,
    /// The sentinel was present; no scan ran.
    AlreadyWarm,
    /// This many markers were written, then the sentinel.
    Loaded(usize),
    /// The scan found no usernames; nothing was written.
    Empty,
    /// Scan, bulk write or sentinel check failed. Logged and skipped.
    Failed,
}

/// Loads "taken" markers for every existing username into the cache.
///
/// The sentinel is written only after the bulk write succeeds, so an
/// interrupted warm leaves no sentinel and the next start retries. The
/// whole sequence (sentinel check, scan, bulk write, sentinel write) runs
/// under one deadline.
pub struct UsernameCacheWarmer {
    cache: Arc<dyn CacheStore>,
    users: Arc<dyn UserRepository>,
    ttl: Duration,
    timeout: Duration,
}

impl UsernameCacheWarmer {
    #[must_use]
    pub fn new(
        cache: Arc<dyn CacheStore>,
        users: Arc<dyn UserRepository>,
        ttl: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            cache,
            users,
            ttl,
            timeout,
        }
    }

    /// Runs one warm attempt. Never fails; every problem is logged.
    pub async fn warm(&self) -> WarmOutcome {
        if !self.cache.is_enabled() {
            info!("Username cache disabled, skipping warm-up");
            return WarmOutcome::Disabled;
        }

        match tokio::time::timeout(self.timeout, self.load()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Username cache warm-up timed out, cache left cold"
                );
                WarmOutcome::Failed
            }
        }
    }

    async fn load(&self) -> WarmOutcome {
        match self.cache.lookup(USERNAME_CACHE_SENTINEL).await {
            CacheLookup::Hit(_) => {
                info!("Username cache already initialized, skipping warm-up");
                return WarmOutcome::AlreadyWarm;
            }
            CacheLookup::Unavailable => {
                warn!("Cache unavailable, skipping username cache warm-up");
                return WarmOutcome::Failed;
            }
            CacheLookup::Miss => {}
        }

        info!("Warming username cache...");

        let usernames = match self.users.list_usernames().await {
            Ok(usernames) => usernames,
            Err(e) => {
                warn!(error = %e, "Username scan failed, cache left cold");
                return WarmOutcome::Failed;
            }
        };

        let batch: HashMap<String, String> = usernames
            .iter()
            .filter(|username| !username.is_empty())
            .map(|username| (keys::username_taken(username), MARKER_VALUE.to_string()))
            .collect();

        if batch.is_empty() {
            info!("No usernames to cache");
            return WarmOutcome::Empty;
        }

        if let Err(e) = self.cache.set_many(&batch, self.ttl).await {
            warn!(error = %e, "Bulk write of username markers failed");
            return WarmOutcome::Failed;
        }

        if let Err(e) = self.cache.set(USERNAME_CACHE_SENTINEL, MARKER_VALUE, self.ttl).await {
            warn!(error = %e, "Failed to write username cache sentinel");
            return WarmOutcome::Failed;
        }

        info!(count = batch.len(), "Username cache warmed");
        WarmOutcome::Loaded(batch.len())
    }
}

impl std::fmt::Debug for UsernameCacheWarmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsernameCacheWarmer")
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
