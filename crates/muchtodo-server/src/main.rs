//! # MuchToDo Server
//!
//! Entry point: load configuration under a bootstrap logger, start logging,
//! wire components, warm the username cache, then serve until SIGINT/SIGTERM.

use anyhow::Context;
use muchtodo_config::ConfigLoader;
use muchtodo_server::{startup, Application};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = startup::load_config(&ConfigLoader::from_default_location())
        .context("failed to load configuration")?;

    startup::init_logging(&config.observability);
    info!("Starting MuchToDo server...");
    startup::print_startup_info(&config);

    let app = match Application::build(&config).await {
        Ok(app) => app,
        Err(e) => {
            error!("Startup failed: {}", e);
            return Err(e.into());
        }
    };
    info!("Listening on http://{}", app.local_addr()?);

    app.run_until(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
