//! Axum router construction for the dashboard API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled for cross-origin front ends.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete router.
///
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/dashboard` -- `WebSocket` panel update stream
/// - `GET /api/counter` -- counter panel
/// - `GET /api/history` -- activity log panel
/// - `POST /api/history/clear` -- clear history and reset the counter
/// - `POST /api/activity-log` -- activity log button click
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws/dashboard", get(ws::ws_dashboard))
        .route("/api/counter", get(handlers::get_counter))
        .route("/api/history", get(handlers::get_history))
        .route("/api/history/clear", post(handlers::clear_history))
        .route("/api/activity-log", post(handlers::open_activity_log))
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
