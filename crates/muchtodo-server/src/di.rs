//! Dependency wiring.
//!
//! Every long-lived component is constructed exactly once here and handed
//! to its consumers as an `Arc`. The cache store in particular is a single
//! explicitly constructed instance shared by the warmer, the username check
//! and the health endpoint.

use muchtodo_config::{AppConfig, CacheBackend, CacheConfig, DatabaseBackend, DatabaseConfig, SecurityConfig};
use muchtodo_core::{MuchTodoError, MuchTodoResult};
use muchtodo_repository::{
    create_pool, DatabasePool, InMemoryTodoRepository, InMemoryUserRepository, MySqlTodoRepository,
    MySqlUserRepository, TodoRepository, UserRepository,
};
use muchtodo_rest::{middleware::AuthMiddlewareState, AppState};
use muchtodo_security::{Clock, PasswordHasher, SystemClock, TokenProvider};
use muchtodo_service::{
    create_redis_pool, AuthServiceImpl, CacheStore, InMemoryCacheStore, RedisCacheStore, TodoServiceImpl,
    UserServiceImpl, UsernameAvailabilityService, UsernameCacheWarmer,
};
use std::sync::Arc;
use tracing::info;

/// Fully wired application components.
pub struct AppModule {
    users: Arc<dyn UserRepository>,
    todos: Arc<dyn TodoRepository>,
    cache: Arc<dyn CacheStore>,
    db_pool: Option<Arc<DatabasePool>>,
    token_provider: Arc<TokenProvider>,
    password_hasher: Arc<PasswordHasher>,
    availability: Arc<UsernameAvailabilityService>,
    cache_config: CacheConfig,
}

impl AppModule {
    /// Connects every backend named by `config` and wires the services.
    pub async fn from_config(config: &AppConfig) -> MuchTodoResult<Self> {
        let builder = AppModuleBuilder::new()
            .with_security_config(config.security.clone())
            .with_cache_config(config.cache.clone());

        let builder = match config.database.backend {
            DatabaseBackend::Mysql => builder.with_database_pool(connect_database(&config.database).await?),
            DatabaseBackend::Memory => {
                info!("Using in-memory user and todo collections");
                builder.with_repositories(
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryTodoRepository::new()),
                )
            }
        };

        builder.with_cache(build_cache(&config.cache)?).build()
    }

    #[must_use]
    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    #[must_use]
    pub fn cache(&self) -> Arc<dyn CacheStore> {
        self.cache.clone()
    }

    #[must_use]
    pub fn token_provider(&self) -> Arc<TokenProvider> {
        self.token_provider.clone()
    }

    /// Startup preload for the username cache.
    #[must_use]
    pub fn cache_warmer(&self) -> UsernameCacheWarmer {
        UsernameCacheWarmer::new(
            self.cache.clone(),
            self.users.clone(),
            self.cache_config.username_ttl(),
            self.cache_config.warm_timeout(),
        )
    }

    /// Builds the request-handling state for the router.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        let auth_service = Arc::new(AuthServiceImpl::new(
            self.users.clone(),
            self.availability.clone(),
            self.password_hasher.clone(),
            self.token_provider.clone(),
        ));
        let user_service = Arc::new(UserServiceImpl::new(
            self.users.clone(),
            self.todos.clone(),
            self.availability.clone(),
            self.password_hasher.clone(),
        ));
        let todo_service = Arc::new(TodoServiceImpl::new(self.todos.clone()));

        AppState::new(
            auth_service,
            user_service,
            todo_service,
            self.users.clone(),
            self.cache.clone(),
        )
    }

    #[must_use]
    pub fn auth_middleware_state(&self) -> AuthMiddlewareState {
        AuthMiddlewareState::new(self.token_provider.clone())
    }

    /// Releases backend connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.db_pool {
            pool.close().await;
        }
    }
}

async fn connect_database(config: &DatabaseConfig) -> MuchTodoResult<Arc<DatabasePool>> {
    let pool = create_pool(config).await?;
    pool.run_migrations().await?;
    Ok(pool)
}

/// Builds the cache store selected by `config`. A disabled cache is a store
/// that reports itself disabled, so consumers never branch on `Option`.
pub fn build_cache(config: &CacheConfig) -> MuchTodoResult<Arc<dyn CacheStore>> {
    if !config.enabled {
        info!("Username cache disabled");
        return Ok(Arc::new(RedisCacheStore::disabled()));
    }

    match config.backend {
        CacheBackend::Redis => {
            let pool = create_redis_pool(config)?;
            info!("Redis cache pool created (max_size: {})", config.pool_size);
            Ok(Arc::new(RedisCacheStore::new(Arc::new(pool))))
        }
        CacheBackend::Memory => {
            info!("Using in-memory username cache");
            Ok(Arc::new(InMemoryCacheStore::new()))
        }
    }
}

/// Builder for [`AppModule`].
#[derive(Default)]
pub struct AppModuleBuilder {
    users: Option<Arc<dyn UserRepository>>,
    todos: Option<Arc<dyn TodoRepository>>,
    cache: Option<Arc<dyn CacheStore>>,
    db_pool: Option<Arc<DatabasePool>>,
    security: Option<SecurityConfig>,
    cache_config: CacheConfig,
    clock: Option<Arc<dyn Clock>>,
}

impl AppModuleBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses MySQL-backed collections over `pool`.
    #[must_use]
    pub fn with_database_pool(mut self, pool: Arc<DatabasePool>) -> Self {
        self.users = Some(Arc::new(MySqlUserRepository::new(pool.clone())));
        self.todos = Some(Arc::new(MySqlTodoRepository::new(pool.clone())));
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_repositories(mut self, users: Arc<dyn UserRepository>, todos: Arc<dyn TodoRepository>) -> Self {
        self.users = Some(users);
        self.todos = Some(todos);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_security_config(mut self, config: SecurityConfig) -> Self {
        self.security = Some(config);
        self
    }

    #[must_use]
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Overrides the wall clock used for token issuance and validation.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> MuchTodoResult<AppModule> {
        let users = self
            .users
            .ok_or_else(|| MuchTodoError::Configuration("user repository not configured".to_string()))?;
        let todos = self
            .todos
            .ok_or_else(|| MuchTodoError::Configuration("todo repository not configured".to_string()))?;
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(RedisCacheStore::disabled()));
        let security = self.security.unwrap_or_default();
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let token_provider = Arc::new(TokenProvider::new(&security, clock)?);
        let password_hasher = Arc::new(PasswordHasher::with_cost(security.password_hash_cost));
        let availability = Arc::new(UsernameAvailabilityService::new(
            cache.clone(),
            users.clone(),
            self.cache_config.username_ttl(),
        ));

        Ok(AppModule {
            users,
            todos,
            cache,
            db_pool: self.db_pool,
            token_provider,
            password_hasher,
            availability,
            cache_config: self.cache_config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muchtodo_service::{CacheExt, WarmOutcome};

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Memory;
        config.cache.backend = CacheBackend::Memory;
        config.security.password_hash_cost = 1;
        config
    }

    #[tokio::test]
    async fn test_memory_backends_wire_up() {
        let module = AppModule::from_config(&memory_config()).await.unwrap();
        assert!(module.cache().is_enabled());
        assert!(module.user_repository().health_check().await.is_ok());
        assert_eq!(module.cache_warmer().warm().await, WarmOutcome::Empty);
    }

    #[tokio::test]
    async fn test_disabled_cache_skips_warm() {
        let mut config = memory_config();
        config.cache.enabled = false;

        let module = AppModule::from_config(&config).await.unwrap();
        assert!(!module.cache().is_enabled());
        assert_eq!(module.cache_warmer().warm().await, WarmOutcome::Disabled);
    }

    #[tokio::test]
    async fn test_warm_sees_existing_users() {
        let users = Arc::new(InMemoryUserRepository::new());
        users
            .save(&muchtodo_core::User::new("alice".to_string(), "hash".to_string(), None, None))
            .await
            .unwrap();

        let module = AppModuleBuilder::new()
            .with_repositories(users, Arc::new(InMemoryTodoRepository::new()))
            .with_cache(Arc::new(InMemoryCacheStore::new()))
            .build()
            .unwrap();

        assert_eq!(module.cache_warmer().warm().await, WarmOutcome::Loaded(1));
        assert!(module.cache().lookup("username-taken:alice").await.is_hit());
    }

    #[test]
    fn test_build_requires_repositories() {
        let err = AppModuleBuilder::new().build().err().unwrap();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_build_rejects_empty_secret() {
        let security = SecurityConfig {
            jwt_secret: String::new(),
            ..SecurityConfig::default()
        };
        let result = AppModuleBuilder::new()
            .with_repositories(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryTodoRepository::new()),
            )
            .with_security_config(security)
            .build();
        assert!(result.is_err());
    }
}
