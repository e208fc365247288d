//! Key-value cache tier.
//!
//! The cache is an optimization in front of the user collection, never the
//! authority. Every store reports a miss and an unavailable backend as two
//! different things so callers can fail open explicitly.

pub mod keys;
mod memory;
mod redis_cache;
mod store;
mod warmer;

pub use memory::InMemoryCacheStore;
pub use redis_cache::{create_redis_pool, RedisCacheStore};
pub use store::{CacheError, CacheExt, CacheLookup, CacheResult, CacheStore};
pub use warmer::{UsernameCacheWarmer, WarmOutcome};

#[cfg(test)]
pub use store::MockCacheStore;
