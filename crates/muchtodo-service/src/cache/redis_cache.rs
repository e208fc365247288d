//! Redis-backed cache store.

use super::store::{CacheError, CacheResult, CacheStore};
use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use muchtodo_config::CacheConfig;
use muchtodo_core::{MuchTodoError, MuchTodoResult};
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Creates a Redis connection pool.
///
/// Building the pool does not connect; an unreachable or stalled server
/// surfaces later as [`CacheError::Unavailable`] once the connect timeout
/// elapses.
pub fn create_redis_pool(config: &CacheConfig) -> MuchTodoResult<Pool> {
    info!("Creating Redis connection pool...");

    Config::from_url(&config.redis_url)
        .builder()
        .map_err(|e| MuchTodoError::Configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size)
        .wait_timeout(Some(config.connect_timeout()))
        .create_timeout(Some(config.connect_timeout()))
        .recycle_timeout(Some(config.connect_timeout()))
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| MuchTodoError::Configuration(format!("Failed to create Redis pool: {}", e)))
}

/// Redis-based cache store.
pub struct RedisCacheStore {
    pool: Option<Arc<Pool>>,
}

impl RedisCacheStore {
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// A store that holds nothing: every read misses, every write is dropped.
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    async fn conn(&self, pool: &Pool) -> CacheResult<deadpool_redis::Connection> {
        pool.get()
            .await
            .map_err(|e| CacheError::Unavailable(format!("Failed to get Redis connection: {}", e)))
    }
}

// Connection drops and refused connections come back as command errors.
fn command_error(context: &str, err: &redis::RedisError) -> CacheError {
    if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() || err.is_timeout() {
        CacheError::Unavailable(format!("{}: {}", context, err))
    } else {
        CacheError::Operation(format!("{}: {}", context, err))
    }
}

// SET EX takes whole seconds: round partial seconds up, never down to zero.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs()
        .saturating_add(u64::from(ttl.subsec_nanos() > 0))
        .max(1)
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let Some(pool) = &self.pool else {
            return Ok(None);
        };

        let mut conn = self.conn(pool).await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| command_error(&format!("Failed to get key '{}'", key), &e))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };

        let mut conn = self.conn(pool).await?;
        let ttl_secs = ttl_secs(ttl);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| command_error(&format!("Failed to set key '{}'", key), &e))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn set_many(&self, entries: &HashMap<String, String>, ttl: Duration) -> CacheResult<()> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };
        if entries.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn(pool).await?;
        let ttl_secs = ttl_secs(ttl);

        // MULTI/EXEC: the batch lands as a whole or not at all
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.set_ex(key, value, ttl_secs).ignore();
        }

        pipe.query_async::<()>(&mut *conn)
            .await
            .map_err(|e| command_error(&format!("Failed to write batch of {} keys", entries.len()), &e))?;

        debug!("Cached batch of {} keys with TTL {}s", entries.len(), ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let Some(pool) = &self.pool else {
            return Ok(false);
        };

        let mut conn = self.conn(pool).await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| command_error(&format!("Failed to delete key '{}'", key), &e))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn ping(&self) -> CacheResult<()> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };

        let mut conn = self.conn(pool).await?;
        redis::cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map_err(|e| command_error("PING failed", &e))?;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }
}

impl std::fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("enabled", &self.pool.is_some())
            .finish()
    }
}
