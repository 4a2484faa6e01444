use axum::Router;
use nt_auth::AuthConfig;
use nt_storage::FallbackConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod state;
pub mod stream;

pub use service::{CategoryResponse, CategoryService};
pub use state::AppState;
pub use stream::{Notifier, StreamEvent};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub auth: AuthConfig,
    pub fallback: FallbackConfig,
    pub primary_path: Option<PathBuf>,
    pub document_dir: Option<PathBuf>,
    pub heartbeat: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            auth: AuthConfig::default(),
            fallback: FallbackConfig::default(),
            primary_path: None,
            document_dir: None,
            heartbeat: stream::DEFAULT_HEARTBEAT,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    routes::router(Arc::new(state))
}

/// Binds `config.addr` and serves until ctrl-c.
pub async fn serve(config: ServerConfig) -> nt_core::Result<()> {
    let state = AppState::from_config(&config).await;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("🚀 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

pub mod prelude {
    pub use crate::{create_app, AppState, CategoryService, ServerConfig};
    pub use nt_core::{Article, Error, Result};
}
