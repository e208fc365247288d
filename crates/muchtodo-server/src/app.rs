//! Application lifecycle: wire, warm, bind, serve, drain.

use crate::di::AppModule;
use muchtodo_config::{AppConfig, ServerConfig};
use muchtodo_core::{MuchTodoError, MuchTodoResult};
use muchtodo_rest::create_router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// A wired server with a bound listener, ready to serve.
pub struct Application {
    module: AppModule,
    listener: TcpListener,
    server_config: ServerConfig,
}

impl Application {
    /// Wires every component, warms the username cache and binds the
    /// listener. Connections are not accepted before warming has finished
    /// or hit its deadline.
    pub async fn build(config: &AppConfig) -> MuchTodoResult<Self> {
        let module = AppModule::from_config(config).await?;

        let outcome = module.cache_warmer().warm().await;
        info!(?outcome, "Username cache warm-up finished");

        let addr = config.server.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| MuchTodoError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        Ok(Self {
            module,
            listener,
            server_config: config.server.clone(),
        })
    }

    pub fn local_addr(&self) -> MuchTodoResult<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| MuchTodoError::Internal(format!("Listener has no local address: {}", e)))
    }

    #[must_use]
    pub fn module(&self) -> &AppModule {
        &self.module
    }

    /// Serves until `shutdown` resolves, then gives in-flight requests the
    /// configured grace period before aborting the server.
    pub async fn run_until<F>(self, shutdown: F) -> MuchTodoResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = create_router(
            self.module.app_state(),
            self.module.auth_middleware_state(),
            &self.server_config,
        );
        let grace = self.server_config.shutdown_grace();

        let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
        let signal = async move {
            shutdown.await;
            let _ = signalled_tx.send(());
        };

        let server = axum::serve(self.listener, router).with_graceful_shutdown(signal);
        let mut handle = tokio::spawn(async move { server.await });

        let served = tokio::select! {
            joined = &mut handle => joined,
            _ = signalled_rx => match tokio::time::timeout(grace, &mut handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(grace_secs = grace.as_secs(), "In-flight requests did not drain, aborting");
                    handle.abort();
                    Ok(Ok(()))
                }
            },
        };

        self.module.close().await;

        match served {
            Ok(Ok(())) => {
                info!("Server shutdown complete");
                Ok(())
            }
            Ok(Err(e)) => Err(MuchTodoError::Internal(format!("Server error: {}", e))),
            Err(e) => Err(MuchTodoError::Internal(format!("Server task failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muchtodo_config::{CacheBackend, DatabaseBackend};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.server.shutdown_grace_secs = 1;
        config.database.backend = DatabaseBackend::Memory;
        config.cache.backend = CacheBackend::Memory;
        config.security.password_hash_cost = 1;
        config
    }

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", path);
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let app = Application::build(&test_config()).await.unwrap();
        let addr = app.local_addr().unwrap();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(app.run_until(async move {
            let _ = stop_rx.await;
        }));

        let response = get(addr, "/ping").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("pong"));

        stop_tx.send(()).unwrap();
        assert!(server.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_build_binds_ephemeral_port() {
        let app = Application::build(&test_config()).await.unwrap();
        assert!(app.module().cache().is_enabled());
        assert!(app.local_addr().unwrap().port() > 0);
    }
}
