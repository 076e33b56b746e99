//! HTTP server lifecycle.
//!
//! [`bind`] resolves and binds the listener, [`serve`] runs the router on
//! it until the shutdown token fires. [`start_server`] does both.

use std::net::SocketAddr;
use std::sync::Arc;

use headcount_core::config::ServerSettings;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ServerSettings::default())
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
        }
    }
}

/// Bind a TCP listener for `config`.
///
/// # Errors
///
/// [`ServerError::Bind`] if the address is malformed or already in use.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))
}

/// Serve the router on `listener` until `shutdown` is cancelled.
///
/// # Errors
///
/// [`ServerError::Serve`] on a fatal I/O error.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Dashboard server listening");
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))
}

/// Bind and serve until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server hits a
/// fatal I/O error.
pub async fn start_server(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let listener = bind(config).await?;
    serve(listener, state, shutdown).await
}

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
