//! `WebSocket` handler for live panel updates.
//!
//! Clients connect to `GET /ws/dashboard`, first receive both panels as
//! they currently stand, then a JSON-encoded [`DashboardUpdate`] each time
//! a controller renders.
//!
//! If a client falls behind, lagged updates are skipped. Every update
//! carries a whole panel, so the client resumes from a complete state.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::{AppState, DashboardUpdate};

/// Upgrade an HTTP request to a `WebSocket` and begin streaming updates.
///
/// # Route
///
/// `GET /ws/dashboard`
pub async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

async fn send_update(socket: &mut WebSocket, update: &DashboardUpdate) -> bool {
    let json = match serde_json::to_string(update) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize dashboard update: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Subscribe before reading the snapshot so nothing falls in between.
    let mut rx = state.subscribe();
    let current = state.current();
    for update in [
        DashboardUpdate::Counter(current.counter),
        DashboardUpdate::History(current.history),
    ] {
        if !send_update(&mut socket, &update).await {
            debug!("WebSocket client disconnected (initial send failed)");
            return;
        }
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(update) => {
                        if !send_update(&mut socket, &update).await {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}
