//! Username uniqueness check (cache-aside).

use crate::cache::keys::{self, MARKER_VALUE};
use crate::cache::{CacheExt, CacheLookup, CacheStore};
use muchtodo_core::MuchTodoResult;
use muchtodo_repository::UserRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Answers "is this username free?" from the cache when it can and from the
/// user collection when it must.
///
/// A cache hit means taken. A miss or an unavailable cache falls through to
/// the collection; only "taken" answers are ever cached.
pub struct UsernameAvailabilityService {
    cache: Arc<dyn CacheStore>,
    users: Arc<dyn UserRepository>,
    ttl: Duration,
}

impl UsernameAvailabilityService {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheStore>, users: Arc<dyn UserRepository>, ttl: Duration) -> Self {
        Self { cache, users, ttl }
    }

    /// Returns `true` when no account holds `username`.
    ///
    /// Errors only when the user collection itself fails.
    pub async fn is_available(&self, username: &str) -> MuchTodoResult<bool> {
        let key = keys::username_taken(username);

        let cache_reachable = match self.cache.lookup(&key).await {
            CacheLookup::Hit(_) => {
                debug!(username, "Username taken (cache hit)");
                return Ok(false);
            }
            CacheLookup::Miss => true,
            CacheLookup::Unavailable => false,
        };

        let taken = self.users.find_by_username(username).await?.is_some();
        debug!(username, taken, "Username checked against user collection");

        if taken && cache_reachable {
            self.cache.set_best_effort(&key, MARKER_VALUE, self.ttl).await;
        }

        Ok(!taken)
    }

    /// Records `username` as taken after it has been claimed.
    pub async fn mark_taken(&self, username: &str) {
        self.cache
            .set_best_effort(&keys::username_taken(username), MARKER_VALUE, self.ttl)
            .await;
    }

    /// Drops the marker for a username that is no longer held.
    pub async fn release(&self, username: &str) {
        self.cache.delete_best_effort(&keys::username_taken(username)).await;
    }
}

impl std::fmt::Debug for UsernameAvailabilityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsernameAvailabilityService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, InMemoryCacheStore, MockCacheStore, UsernameCacheWarmer, WarmOutcome};
    use muchtodo_core::{MuchTodoError, User};
    use muchtodo_repository::{InMemoryUserRepository, MockUserRepository};

    const HOUR: Duration = Duration::from_secs(3600);

    fn user(name: &str) -> User {
        User::new(name.to_string(), "hash".to_string(), None, None)
    }

    #[tokio::test(start_paused = true)]
    async fn test_warmed_scenario() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let users = Arc::new(InMemoryUserRepository::with_users(vec![user("alice"), user("bob")]));

        let warmer = UsernameCacheWarmer::new(cache.clone(), users.clone(), HOUR, Duration::from_secs(15));
        assert_eq!(warmer.warm().await, WarmOutcome::Loaded(2));
        assert!(cache.lookup("username-taken:alice").await.is_hit());
        assert_eq!(cache.lookup("username-taken:carol").await, CacheLookup::Miss);

        let service = UsernameAvailabilityService::new(cache.clone(), users, HOUR);
        assert!(!service.is_available("alice").await.unwrap());
        assert!(service.is_available("carol").await.unwrap());
        // negatives are not cached
        assert_eq!(cache.lookup("username-taken:carol").await, CacheLookup::Miss);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cold_cache_has_no_false_negatives() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let users = Arc::new(InMemoryUserRepository::with_users(vec![user("alice")]));
        let service = UsernameAvailabilityService::new(cache.clone(), users, HOUR);

        assert!(!service.is_available("alice").await.unwrap());
        // the fall-through populated the marker
        assert!(cache.lookup("username-taken:alice").await.is_hit());
    }

    #[tokio::test]
    async fn test_hit_skips_user_collection() {
        let cache = Arc::new(InMemoryCacheStore::new());
        cache.set("username-taken:alice", "true", HOUR).await.unwrap();

        let mut users = MockUserRepository::new();
        users.expect_find_by_username().never();

        let service = UsernameAvailabilityService::new(cache, Arc::new(users), HOUR);
        assert!(!service.is_available("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_cache_fails_open() {
        let mut cache = MockCacheStore::new();
        cache
            .expect_get()
            .returning(|_| Err(CacheError::Unavailable("connection refused".to_string())));
        cache.expect_set().never();

        let users = Arc::new(InMemoryUserRepository::with_users(vec![user("alice")]));
        let service = UsernameAvailabilityService::new(Arc::new(cache), users, HOUR);

        assert!(!service.is_available("alice").await.unwrap());
        assert!(service.is_available("carol").await.unwrap());
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let users = Arc::new(InMemoryUserRepository::new());
        users.set_offline(true);

        let service = UsernameAvailabilityService::new(cache, users, HOUR);
        assert!(matches!(
            service.is_available("alice").await,
            Err(MuchTodoError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_mark_and_release() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let service = UsernameAvailabilityService::new(cache.clone(), Arc::new(InMemoryUserRepository::new()), HOUR);

        service.mark_taken("dave").await;
        assert!(!service.is_available("dave").await.unwrap());

        service.release("dave").await;
        assert!(service.is_available("dave").await.unwrap());
    }

    #[tokio::test]
    async fn test_write_failures_are_absorbed() {
        let mut cache = MockCacheStore::new();
        cache
            .expect_set()
            .returning(|_, _, _| Err(CacheError::Unavailable("down".to_string())));
        cache
            .expect_delete()
            .returning(|_| Err(CacheError::Unavailable("down".to_string())));

        let service = UsernameAvailabilityService::new(Arc::new(cache), Arc::new(InMemoryUserRepository::new()), HOUR);
        service.mark_taken("erin").await;
        service.release("erin").await;
    }
}
