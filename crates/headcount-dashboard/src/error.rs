//! Error types for the dashboard binary.

/// Top-level error for the dashboard binary.
///
/// Each variant wraps a specific subsystem error so `main` can propagate
/// with `?`.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: headcount_core::ConfigError,
    },

    /// The HTTP server failed to bind.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: headcount_observer::ServerError,
    },

    /// Simulator settings are out of range.
    #[error("simulator error: {message}")]
    Simulator {
        /// Which setting is wrong.
        message: String,
    },

    /// Installing the shutdown signal handler failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
