//! Server Implementation
//!
//! HTTP 服务器启动和优雅关闭

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use crate::core::{Config, Result, ServerError, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with an already initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<()> {
        let state = self.state.clone();

        // 启动时修复桌台状态漂移
        if let Err(e) = state.order_service().reconcile_tables().await {
            tracing::warn!(error = %e, "Table reconciliation failed at startup");
        }

        let app = crate::api::build_app(&state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ServerError::Bind)?;
        tracing::info!(%addr, environment = %self.config.environment, "FOH server listening");

        let bus = state.message_bus.clone();
        let shutdown = async move {
            shutdown_signal().await;
            tracing::info!("Shutting down...");
            bus.shutdown();
        };

        let token = state.message_bus().shutdown_token().clone();
        let grace = Duration::from_millis(self.config.shutdown_timeout_ms);
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .into_future();

        tokio::select! {
            result = serve => result.map_err(ServerError::Serve)?,
            _ = async {
                token.cancelled().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(timeout_ms = grace.as_millis() as u64, "Graceful shutdown timed out, forcing exit");
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
