//! Error types for the core engine.

use thiserror::Error;

/// Errors raised by the period catalogue and time parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A date/time value could not be parsed.
    #[error("invalid time value {value:?}{}", format_hint(.format))]
    InvalidTime {
        /// The offending input.
        value: String,
        /// The format the value was parsed against, if one was supplied.
        format: Option<String>,
    },

    /// The period catalogue violates its ordering invariant.
    #[error("invalid period catalogue: {message}")]
    InvalidCatalogue { message: String },
}

impl CoreError {
    /// Creates an invalid time error for a date-time stamp.
    pub fn invalid_time(value: impl Into<String>) -> Self {
        Self::InvalidTime {
            value: value.into(),
            format: None,
        }
    }

    /// Creates an invalid time error for a value parsed with an explicit format.
    pub fn invalid_time_with_format(value: impl Into<String>, format: impl Into<String>) -> Self {
        Self::InvalidTime {
            value: value.into(),
            format: Some(format.into()),
        }
    }

    /// Creates an invalid catalogue error.
    pub fn invalid_catalogue(message: impl Into<String>) -> Self {
        Self::InvalidCatalogue {
            message: message.into(),
        }
    }
}

fn format_hint(format: &Option<String>) -> String {
    match format {
        Some(fmt) => format!(" (expected format {fmt:?})"),
        None => String::new(),
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
