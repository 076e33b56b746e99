//! Background startup helper for embedding the server in the binary.
//!
//! ```rust,ignore
//! let (state, commands) = AppState::new();
//! let handle = spawn_observer(&ServerConfig::default(), Arc::new(state), shutdown).await?;
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::server::{self, ServerConfig, ServerError};
use crate::state::AppState;

/// Bind eagerly, then serve on a background Tokio task.
///
/// Binding happens before the spawn so a port conflict surfaces to the
/// caller instead of only in the logs. The task ends when `shutdown` is
/// cancelled.
///
/// # Errors
///
/// [`ServerError::Bind`] if the listener cannot bind.
pub async fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<JoinHandle<()>, ServerError> {
    let listener = server::bind(config).await?;

    let handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, state, shutdown).await {
            tracing::error!(error = %e, "Dashboard server exited with error");
        }
    });

    tracing::info!(port = config.port, "Dashboard server spawned on background task");

    Ok(handle)
}
