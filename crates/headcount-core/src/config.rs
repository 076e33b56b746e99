//! Configuration loading and typed config structures for the dashboard.
//!
//! The configuration lives in `headcount-config.yaml` next to the binary.
//! Every field has a default, so an empty or missing file is valid.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Synthetic ingestion settings.
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

impl DashboardConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override the listener address:
    /// - `HEADCOUNT_HOST` overrides `server.host`
    /// - `HEADCOUNT_PORT` overrides `server.port` (ignored if not a port)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Like [`Self::from_file`], but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unreadable or malformed files.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.server.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty document as a unit, not an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.server.apply_env_overrides();
        Ok(config)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Apply `HEADCOUNT_HOST` / `HEADCOUNT_PORT` on top of the parsed values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HEADCOUNT_HOST") {
            self.host = val;
        }
        if let Some(port) = std::env::var("HEADCOUNT_PORT")
            .ok()
            .and_then(|val| val.parse().ok())
        {
            self.port = port;
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Settings for the synthetic entry/exit generator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulatorConfig {
    /// Whether the generator runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Milliseconds between generated events.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Probability that a generated event is an entry rather than an exit.
    #[serde(default = "default_entry_probability")]
    pub entry_probability: f64,

    /// Random seed for reproducible runs.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_ms: default_interval_ms(),
            entry_probability: default_entry_probability(),
            seed: default_seed(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}

const fn default_interval_ms() -> u64 {
    2_000
}

const fn default_entry_probability() -> f64 {
    0.55
}

const fn default_seed() -> u64 {
    42
}
