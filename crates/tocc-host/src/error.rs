//! Host-visible errors
//!
//! Every boundary operation returns `HostResult<T>`. A `HostError` carries the
//! error class the host raises, a message, and optionally the offending
//! argument or operation as context.

use std::fmt;
use thiserror::Error;

/// Error class raised into the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong runtime type, wrong argument count, bad keyword
    TypeError,
    /// Well-typed argument with an invalid value
    ValueError,
    /// Text that cannot be represented as UTF-8
    UnicodeError,
    /// Unknown method, type or module attribute
    AttributeError,
    /// Access to a handle whose native value was already released
    ReferenceError,
    /// Module or capsule resolution failure
    ImportError,
    /// Failure raised by the native engine, tagged with its class name
    Engine(&'static str),
}

impl ErrorKind {
    /// Name of the error class as the host shows it
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ValueError => "ValueError",
            ErrorKind::UnicodeError => "UnicodeError",
            ErrorKind::AttributeError => "AttributeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::ImportError => "ImportError",
            ErrorKind::Engine(class) => class,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structured error surfaced to the host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct HostError {
    pub kind: ErrorKind,
    pub message: String,
    /// Offending argument, element or operation
    pub context: Option<String>,
}

impl HostError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValueError, message)
    }

    pub fn unicode_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnicodeError, message)
    }

    pub fn attribute_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AttributeError, message)
    }

    pub fn reference_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReferenceError, message)
    }

    pub fn import_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ImportError, message)
    }

    pub fn engine(class: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Engine(class), message)
    }

    /// Attach context, keeping any context already present as the innermost part
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = Some(match self.context.take() {
            Some(inner) => format!("{}: {}", context, inner),
            None => context,
        });
        self
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

/// Result type for boundary operations
pub type HostResult<T> = Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_class_name() {
        let err = HostError::type_error("Expected a str, FileInfo or list. Found: int");
        assert_eq!(
            err.to_string(),
            "TypeError: Expected a str, FileInfo or list. Found: int"
        );
    }

    #[test]
    fn test_engine_kind_display() {
        let err = HostError::engine("DatabaseScriptLogicalError", "file not found");
        assert_eq!(err.kind.name(), "DatabaseScriptLogicalError");
        assert_eq!(err.to_string(), "DatabaseScriptLogicalError: file not found");
    }

    #[test]
    fn test_context_nests_outward() {
        let err = HostError::type_error("bad element")
            .with_context("index 2")
            .with_context("remove_files");
        assert_eq!(err.context.as_deref(), Some("remove_files: index 2"));
    }
}
