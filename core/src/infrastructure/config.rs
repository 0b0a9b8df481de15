//! Configuration for taskwatch front ends.
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `taskwatch.{toml,yaml,json}` file in the working directory, then
//! environment variables prefixed with `TASKWATCH` (`__` separates
//! sections, e.g. `TASKWATCH__SERVER__BASE_URL`).
//!
//! # Example
//!
//! ```no_run
//! use taskwatch_core::infrastructure::config::Settings;
//!
//! let settings = Settings::new().expect("Failed to load configuration");
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use reqwest::Url;
use serde::Deserialize;

use crate::controller::ControllerConfig;
use crate::transport::HttpConfig;

/// Top-level configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Job server settings.
    pub server: ServerSettings,
    /// Polling cadence and timeouts.
    pub polling: PollingSettings,
    /// Logging settings.
    pub telemetry: TelemetrySettings,
}

/// Where the job server lives.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// Root URL of the job server.
    pub base_url: String,
}

/// Polling cadence.
#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    /// Seconds between the end of one poll and the start of the next.
    pub interval_secs: u64,
    /// Per-request timeout in seconds; `0` disables it.
    pub request_timeout_secs: u64,
}

/// Logging output.
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    /// Default filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
    /// Write logs to daily files in this directory instead of stderr.
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from defaults, `taskwatch.*` if present, and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be built or deserialized.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Like [`new`](Self::new), but reads the given file instead of looking
    /// for `taskwatch.*`. The file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed, or if the
    /// result cannot be deserialized.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            // Start with default values
            .set_default("server.base_url", "http://127.0.0.1:10000/")?
            .set_default("polling.interval_secs", 5)?
            .set_default("polling.request_timeout_secs", 30)?
            .set_default("telemetry.log_level", "info")?
            .set_default("telemetry.json", false)?;

        let builder = match file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("taskwatch").required(false)),
        };

        builder
            .add_source(Environment::with_prefix("TASKWATCH").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Parsed server URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` if `server.base_url` is not a URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.server.base_url).map_err(|e| {
            ConfigError::Message(format!("invalid server.base_url '{}': {e}", self.server.base_url))
        })
    }

    /// Delay between polls, never shorter than one second.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs.max(1))
    }

    /// Per-request timeout, `None` when disabled.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.polling.request_timeout_secs > 0)
            .then(|| Duration::from_secs(self.polling.request_timeout_secs))
    }

    /// Controller settings derived from this configuration.
    #[must_use]
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            poll_interval: self.poll_interval(),
        }
    }

    /// Transport settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL is invalid.
    pub fn http_config(&self) -> Result<HttpConfig, ConfigError> {
        Ok(HttpConfig::new(self.base_url()?).with_request_timeout(self.request_timeout()))
    }
}
