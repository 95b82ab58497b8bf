//! CLI error types.

use thiserror::Error;

use supl_core::CoreError;
use supl_export::ExportError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading or processing an export failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// A time value or period catalogue was invalid.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Serializing the report failed.
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}
