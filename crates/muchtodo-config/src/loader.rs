//! Configuration loader with layered sources.

use crate::{AppConfig, DatabaseBackend, DEFAULT_JWT_SECRET, MAX_JWT_EXPIRATION_HOURS, MAX_USERNAME_TTL_SECS};
use config::{Config, ConfigError, Environment, File};
use muchtodo_core::MuchTodoError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loads [`AppConfig`] from layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir`.
    ///
    /// Sources are applied in order, later ones winning:
    /// 1. `{config_dir}/default.toml`
    /// 2. `{config_dir}/{MUCHTODO_ENVIRONMENT}.toml`
    /// 3. `{config_dir}/local.toml` (not committed)
    /// 4. Environment variables with the `MUCHTODO__` prefix, e.g.
    ///    `MUCHTODO__SECURITY__JWT_SECRET`
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> Result<AppConfig, MuchTodoError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        let environment =
            std::env::var("MUCHTODO_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{}.toml", name));
            if Path::new(&path).exists() {
                debug!("Loading config file: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("MUCHTODO")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error)?;
        let app_config: AppConfig = config.try_deserialize().map_err(config_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }
}

/// Rejects configurations the service cannot run with.
pub fn validate_config(config: &AppConfig) -> Result<(), MuchTodoError> {
    if config.security.jwt_secret.is_empty() {
        return Err(MuchTodoError::Configuration("security.jwt_secret must not be empty".to_string()));
    }

    if config.security.jwt_expiration_hours == 0 {
        return Err(MuchTodoError::Configuration(
            "security.jwt_expiration_hours must be at least 1".to_string(),
        ));
    }

    if config.security.jwt_expiration_hours > MAX_JWT_EXPIRATION_HOURS {
        return Err(MuchTodoError::Configuration(format!(
            "security.jwt_expiration_hours must be at most {}",
            MAX_JWT_EXPIRATION_HOURS
        )));
    }

    if config.cache.enabled && config.cache.username_ttl_secs == 0 {
        return Err(MuchTodoError::Configuration(
            "cache.username_ttl_secs must be positive when caching is enabled".to_string(),
        ));
    }

    if config.cache.username_ttl_secs > MAX_USERNAME_TTL_SECS {
        return Err(MuchTodoError::Configuration(format!(
            "cache.username_ttl_secs must be at most {}",
            MAX_USERNAME_TTL_SECS
        )));
    }

    if config.database.backend == DatabaseBackend::Mysql && config.database.url.is_empty() {
        return Err(MuchTodoError::Configuration("database.url is required".to_string()));
    }

    if config.app.is_production() && config.security.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using the default JWT secret in production! This is a security risk.");
    }

    Ok(())
}

fn config_error(err: ConfigError) -> MuchTodoError {
    MuchTodoError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheBackend;
    use std::fs;

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
            [server]
            port = 9000

            [cache]
            backend = "memory"
            username_ttl_secs = 3600

            [security]
            jwt_secret = "file-secret"
            jwt_expiration_hours = 1
            "#,
        )
        .unwrap();

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.username_ttl_secs, 3600);
        assert_eq!(config.security.jwt_expiration_hours, 1);
        // untouched sections keep their defaults
        assert_eq!(config.cache.warm_timeout_secs, 15);
    }

    #[test]
    fn test_local_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[server]\nport = 9000\n").unwrap();
        fs::write(dir.path().join("local.toml"), "[server]\nport = 9100\n").unwrap();

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_validation_rejects_empty_secret() {
        let mut config = AppConfig::default();
        config.security.jwt_secret = String::new();
        assert!(matches!(validate_config(&config), Err(MuchTodoError::Configuration(_))));
    }

    #[test]
    fn test_validation_rejects_zero_lifetime() {
        let mut config = AppConfig::default();
        config.security.jwt_expiration_hours = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_bounds_token_lifetime() {
        let mut config = AppConfig::default();
        config.security.jwt_expiration_hours = MAX_JWT_EXPIRATION_HOURS;
        assert!(validate_config(&config).is_ok());

        config.security.jwt_expiration_hours = 1_000_000_000_000;
        assert!(matches!(validate_config(&config), Err(MuchTodoError::Configuration(_))));
    }

    #[test]
    fn test_validation_bounds_username_ttl() {
        let mut config = AppConfig::default();
        config.cache.username_ttl_secs = MAX_USERNAME_TTL_SECS;
        assert!(validate_config(&config).is_ok());

        config.cache.username_ttl_secs = u64::MAX;
        assert!(matches!(validate_config(&config), Err(MuchTodoError::Configuration(_))));
    }

    #[test]
    fn test_zero_ttl_allowed_when_cache_disabled() {
        let mut config = AppConfig::default();
        config.cache.username_ttl_secs = 0;
        assert!(validate_config(&config).is_err());

        config.cache.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_memory_backend_needs_no_url() {
        let mut config = AppConfig::default();
        config.database.url = String::new();
        assert!(validate_config(&config).is_err());

        config.database.backend = DatabaseBackend::Memory;
        assert!(validate_config(&config).is_ok());
    }
}
