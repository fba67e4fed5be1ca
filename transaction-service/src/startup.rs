//! Application startup and lifecycle management.
//!
//! The database pool is opened in [`Application::build`] and closed once the
//! HTTP server has drained after a shutdown signal.

use crate::config::Config;
use crate::services::{init_metrics, GatewayClient, TransactionRepository};
use crate::{build_router, AppState};
use service_core::error::AppError;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        init_metrics();

        let repository =
            TransactionRepository::connect(&config.database.url, config.database.max_connections)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to open database: {}", e);
                    e
                })?;

        repository.init_schema().await.map_err(|e| {
            tracing::error!("Failed to initialize database schema: {}", e);
            e
        })?;

        let gateway = GatewayClient::new(config.gateway.clone())?;
        if config.gateway.secret_in_query {
            tracing::warn!(
                "GATEWAY_SECRET_IN_QUERY is enabled - merchant secrets will appear in gateway URLs"
            );
        }
        tracing::info!(base_url = %config.gateway.base_url, "Gateway client initialized");

        let state = AppState {
            config: config.clone(),
            repository,
            gateway,
        };

        // Port 0 = random port for testing
        let host: std::net::IpAddr = config.server.host.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid HOST '{}': {}",
                config.server.host,
                e
            ))
        })?;
        let addr = SocketAddr::new(host, config.server.port);
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Transaction service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the application state.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `shutdown` resolves, then close the database pool.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let repository = self.state.repository.clone();
        let router = build_router(self.state);

        let result = axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        repository.close().await;

        if let Err(e) = &result {
            tracing::error!("HTTP server error: {}", e);
        }
        result
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
