//! Error types for reading and processing substitution exports.

use std::fmt;
use thiserror::Error;

use supl_core::CoreError;

/// The category of an export error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportErrorCode {
    /// The document is not well-formed XML.
    InvalidDocument,
    /// A date or time field could not be parsed.
    InvalidTime,
    /// The document is neither a students nor a teachers export.
    UnsupportedDocument,
    /// The export file could not be read.
    Io,
}

impl ExportErrorCode {
    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidDocument => "invalid_document",
            Self::InvalidTime => "invalid_time",
            Self::UnsupportedDocument => "unsupported_document",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ExportErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while reading or processing an export.
#[derive(Debug, Error)]
pub struct ExportError {
    code: ExportErrorCode,
    message: String,
    /// Element the error was found in, e.g. `"VypisSuplovaniZaka"`.
    element: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ExportError {
    /// Creates a new export error with the given code and message.
    pub fn new(code: ExportErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            element: None,
            source: None,
        }
    }

    /// Creates an invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::new(ExportErrorCode::InvalidDocument, message)
    }

    /// Creates an invalid time error.
    pub fn invalid_time(message: impl Into<String>) -> Self {
        Self::new(ExportErrorCode::InvalidTime, message)
    }

    /// Creates an unsupported document error.
    pub fn unsupported_document(message: impl Into<String>) -> Self {
        Self::new(ExportErrorCode::UnsupportedDocument, message)
    }

    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ExportErrorCode::Io, message)
    }

    /// Sets the element this error was found in.
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ExportErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the element name, if set.
    pub fn element(&self) -> Option<&str> {
        self.element.as_deref()
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref element) = self.element {
            write!(f, "[{}] ", element)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<CoreError> for ExportError {
    fn from(err: CoreError) -> Self {
        let code = match err {
            CoreError::InvalidTime { .. } => ExportErrorCode::InvalidTime,
            CoreError::InvalidCatalogue { .. } => ExportErrorCode::InvalidDocument,
        };
        Self::new(code, err.to_string()).with_source(err)
    }
}

/// A specialized Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_display() {
        assert_eq!(ExportErrorCode::InvalidDocument.as_str(), "invalid_document");
        assert_eq!(ExportErrorCode::InvalidTime.to_string(), "invalid_time");
    }

    #[test]
    fn export_error_creation() {
        let err = ExportError::unsupported_document("no substitution rows");
        assert_eq!(err.code(), ExportErrorCode::UnsupportedDocument);
        assert_eq!(err.message(), "no substitution rows");
        assert!(err.element().is_none());
    }

    #[test]
    fn export_error_display() {
        let err = ExportError::invalid_time("bad CasOd").with_element("VypisSuplovaniZaka");
        let display = err.to_string();
        assert!(display.contains("[VypisSuplovaniZaka]"));
        assert!(display.contains("invalid_time"));
        assert!(display.contains("bad CasOd"));
    }

    #[test]
    fn from_core_error_keeps_source() {
        use std::error::Error;
        let err: ExportError = CoreError::invalid_time("25:99").into();
        assert_eq!(err.code(), ExportErrorCode::InvalidTime);
        assert!(err.source().is_some());
        assert!(err.message().contains("25:99"));
    }
}
