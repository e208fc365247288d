//! Process startup helpers.

use muchtodo_config::{AppConfig, ConfigLoader, ObservabilityConfig};
use muchtodo_core::MuchTodoResult;
use tracing::{info, Subscriber};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Subscriber used while the configuration itself is being loaded, before
/// the configured log level and format are known.
#[must_use]
pub fn bootstrap_subscriber() -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish()
}

/// Loads the configuration with loader diagnostics (such as the warning
/// about a default JWT secret in production) routed to the bootstrap
/// subscriber.
pub fn load_config(loader: &ConfigLoader) -> MuchTodoResult<AppConfig> {
    load_config_logged(loader, bootstrap_subscriber())
}

/// Loads the configuration with `subscriber` as the scoped default for the
/// duration of the load.
pub fn load_config_logged<S>(loader: &ConfigLoader, subscriber: S) -> MuchTodoResult<AppConfig>
where
    S: Subscriber + Send + Sync + 'static,
{
    tracing::subscriber::with_default(subscriber, || loader.load())
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over the
/// configured level.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("MuchToDo API v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);
    info!("REST API:  http://{}", addr);
    info!("Health:    http://{}/health", addr);
    info!("API Docs:  http://{}/api-docs/openapi.json", addr);
    info!(
        "Database:  {:?}, cache: {}",
        config.database.backend,
        if config.cache.enabled {
            format!("{:?}", config.cache.backend)
        } else {
            "disabled".to_string()
        }
    );
    info!("{}", separator);
}
