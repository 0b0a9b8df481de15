use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use super::config::TelemetrySettings;

/// Builder for the process-wide tracing subscriber.
pub struct TelemetryBuilder {
    service_name: String,
    log_level: String,
    json: bool,
    log_dir: Option<PathBuf>,
}

impl TelemetryBuilder {
    /// Starts a builder for `service_name` that logs at `info` as plain
    /// text to stderr.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            log_level: "info".to_string(),
            json: false,
            log_dir: None,
        }
    }

    /// Applies the `[telemetry]` section of the settings.
    #[must_use]
    pub fn with_settings(self, settings: &TelemetrySettings) -> Self {
        let builder = self
            .with_log_level(settings.log_level.clone())
            .with_json(settings.json);
        match &settings.log_dir {
            Some(dir) => builder.with_log_dir(dir.clone()),
            None => builder,
        }
    }

    /// Default filter directive, used when `RUST_LOG` is not set.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Emits JSON lines instead of human-readable text.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Sends output to a daily-rolling file instead of stderr.
    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Installs the subscriber.
    ///
    /// The returned guard flushes the file writer on drop and must be held
    /// for the lifetime of the process. It is `None` when logging to stderr.
    ///
    /// # Errors
    ///
    /// Returns an error if the log directory cannot be created or a global
    /// subscriber is already installed.
    pub fn init(self) -> Result<Option<WorkerGuard>> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let (writer, guard) = match &self.log_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
                let appender =
                    tracing_appender::rolling::daily(dir, format!("{}.log", self.service_name));
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (BoxMakeWriter::new(writer), Some(guard))
            }
            None => (BoxMakeWriter::new(std::io::stderr), None),
        };

        let fmt_layer = if self.json {
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_span_events(FmtSpan::CLOSE)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(writer)
                .with_ansi(self.log_dir.is_none())
                .boxed()
        };

        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to init subscriber")?;

        Ok(guard)
    }
}
