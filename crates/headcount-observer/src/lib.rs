//! HTTP and `WebSocket` surface for the Headcount dashboard.
//!
//! The sync controllers render into a [`BroadcastView`], which stores the
//! latest state of each screen in [`AppState`] and fans every change out
//! over a broadcast channel. This crate serves:
//!
//! - **`WebSocket` endpoint** (`/ws/dashboard`) streaming whole-panel
//!   updates, with lagging clients skipping ahead
//! - **REST reads** of the counter and activity log panels
//! - **REST commands** (clear history, open activity log) queued back to
//!   the controllers
//! - **Minimal HTML page** (`GET /`) with the headline figures
//!
//! [`BroadcastView`]: view::BroadcastView
//! [`AppState`]: state::AppState

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod view;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::spawn_observer;
pub use state::{AppState, DashboardCommand, DashboardSnapshot, DashboardUpdate};
pub use view::BroadcastView;
