//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `verasync.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;
use verasync_adapter_vera_http::VeraConfig;
use verasync_app::services::sync_loop::{LoopConfig, PollProfile};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hub address and plain request timeout.
    pub hub: VeraConfig,
    /// Long-poll parameters for both link states.
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
}

/// Long-poll timing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub connected_min_delay_ms: u64,
    pub connected_timeout_secs: u64,
    pub disconnected_min_delay_ms: u64,
    pub disconnected_timeout_secs: u64,
    /// Local wait before each request while disconnected.
    pub disconnected_pause_ms: u64,
    /// Slack on top of the hub timeout before a poll counts as hung.
    pub grace_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `verasync.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("verasync.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("VERASYNC_HOST") {
            self.hub.host = val;
        }
        if let Ok(val) = std::env::var("VERASYNC_PORT")
            && let Ok(port) = val.parse()
        {
            self.hub.port = port;
        }
        if let Ok(val) = std::env::var("VERASYNC_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hub.host.trim().is_empty() {
            return Err(ConfigError::Validation("hub host must not be empty".to_string()));
        }
        if self.hub.port == 0 {
            return Err(ConfigError::Validation("hub port must be non-zero".to_string()));
        }
        if self.polling.grace_secs == 0 {
            return Err(ConfigError::Validation(
                "polling grace must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl PollingConfig {
    #[must_use]
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            connected: PollProfile::new(
                Duration::from_millis(self.connected_min_delay_ms),
                Duration::from_secs(self.connected_timeout_secs),
                Duration::ZERO,
            ),
            disconnected: PollProfile::new(
                Duration::from_millis(self.disconnected_min_delay_ms),
                Duration::from_secs(self.disconnected_timeout_secs),
                Duration::from_millis(self.disconnected_pause_ms),
            ),
        }
    }

    #[must_use]
    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            connected_min_delay_ms: 500,
            connected_timeout_secs: 10,
            disconnected_min_delay_ms: 10_000,
            disconnected_timeout_secs: 15,
            disconnected_pause_ms: 1_000,
            grace_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "verasyncd=info,verasync_app=info,verasync_adapter_vera_http=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
