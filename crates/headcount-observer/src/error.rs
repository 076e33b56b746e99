//! Error types for the dashboard API server.
//!
//! [`ObserverError`] converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the dashboard API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// No route matched the request.
    #[error("not found: {0}")]
    NotFound(String),

    /// The controllers are no longer accepting commands.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
