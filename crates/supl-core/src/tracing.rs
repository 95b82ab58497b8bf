//! Tracing setup for supl
//!
//! Logs always go to stderr: stdout carries the report itself.
//! `RUST_LOG` overrides the default `supl=<level>` directive.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Compact single-line format without timestamps
    #[default]
    Compact,
    /// JSON lines, for batch runs whose logs are collected
    Json,
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// The default log level when RUST_LOG is not set
    pub default_level: Level,
    /// Output format for log messages
    pub output_format: TracingOutputFormat,
    /// Whether to include module path and file/line information
    pub include_location: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
        }
    }
}

impl TracingConfig {
    /// Config for `--debug` runs.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_location: true,
            ..Self::default()
        }
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    fn default_directive(&self) -> String {
        format!("supl={}", self.default_level)
    }
}

/// Initialize tracing with the given configuration.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(config.include_location);

    let layer = match config.output_format {
        TracingOutputFormat::Compact => layer.compact().without_time().boxed(),
        TracingOutputFormat::Json => layer.json().boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(env_filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
