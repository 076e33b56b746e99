//! REST endpoint handlers for the dashboard server.
//!
//! Reads are served from the last rendered panels in [`AppState`]; writes
//! are queued as [`DashboardCommand`]s for the controller loop and answered
//! with `202 Accepted`. The outcome of a command shows up later in the
//! panels and on the `WebSocket`.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/counter` | Counter panel |
//! | `GET` | `/api/history` | Activity log panel |
//! | `POST` | `/api/history/clear` | Clear history and reset the counter |
//! | `POST` | `/api/activity-log` | Activity log button click |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse};

use crate::error::ObserverError;
use crate::state::{AppState, CounterPanel, DashboardCommand, HistoryPanel};

/// Body returned for accepted commands.
#[derive(Debug, serde::Serialize)]
struct CommandResponse {
    /// Always `true`; failures use [`ObserverError`].
    accepted: bool,
    /// Human-readable description of what was queued.
    message: &'static str,
}

/// Serve a minimal HTML page with the current figures and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.current();
    let counter = snapshot.counter;
    let entries = snapshot.history.entries.len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Headcount</title>
    <style>
        body {{ font-family: system-ui, sans-serif; padding: 2rem; max-width: 640px; margin: 0 auto; }}
        .big {{ font-size: 3rem; font-weight: bold; }}
        .muted {{ color: #666; }}
    </style>
</head>
<body>
    <h1>Headcount</h1>
    <p class="big">{people_inside}</p>
    <p>Entered {entered} / Exited {exited}</p>
    <p class="muted">{last_updated}</p>
    <p class="muted">{entries} log entries</p>
    <ul>
        <li><a href="/api/counter">/api/counter</a></li>
        <li><a href="/api/history">/api/history</a></li>
        <li>/ws/dashboard (WebSocket)</li>
    </ul>
</body>
</html>"#,
        people_inside = counter.people_inside,
        entered = counter.entered,
        exited = counter.exited,
        last_updated = counter.last_updated,
    ))
}

/// Current counter panel.
pub async fn get_counter(State(state): State<Arc<AppState>>) -> Json<CounterPanel> {
    Json(state.current().counter)
}

/// Current activity log panel.
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<HistoryPanel> {
    Json(state.current().history)
}

/// Queue the clear-history reset.
///
/// # Errors
///
/// [`ObserverError::Unavailable`] once the controllers have shut down.
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    enqueue(&state, DashboardCommand::ClearHistory, "clear history queued")
}

/// Forward an activity log button click.
///
/// # Errors
///
/// [`ObserverError::Unavailable`] once the controllers have shut down.
pub async fn open_activity_log(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    enqueue(
        &state,
        DashboardCommand::OpenActivityLog,
        "activity log request queued",
    )
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ObserverError {
    ObserverError::NotFound(uri.path().to_owned())
}

fn enqueue(
    state: &AppState,
    command: DashboardCommand,
    message: &'static str,
) -> Result<(StatusCode, Json<CommandResponse>), ObserverError> {
    if !state.send_command(command) {
        return Err(ObserverError::Unavailable(String::from(
            "dashboard is shutting down",
        )));
    }
    Ok((
        StatusCode::ACCEPTED,
        Json(CommandResponse {
            accepted: true,
            message,
        }),
    ))
}
