//! Unified error type for the dualled-lib crate.
//!
//! [`DualledError`] wraps sink failures (`SinkError`) and the domain-specific
//! error kinds (`Unsupported`, `Config`, `Color`, `Request`). `From` impls
//! allow `?` to propagate across module boundaries.

use std::fmt;

use crate::sink::SinkError;

/// Unified error type for dualled-lib operations.
#[derive(Debug)]
pub enum DualledError {
    /// Request for a light id outside the supported set. Nothing was mutated.
    Unsupported(i32),
    /// Light name that does not match any known light.
    UnknownLight(String),
    /// Writing to (or opening) a control channel failed.
    Sink(SinkError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
    /// Color parsing error.
    Color(String),
    /// Malformed textual light request.
    Request(String),
}

impl fmt::Display for DualledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DualledError::Unsupported(id) => write!(f, "Unsupported light id: {id}"),
            DualledError::UnknownLight(name) => write!(f, "Unknown light: {name}"),
            DualledError::Sink(e) => write!(f, "{e}"),
            DualledError::Io(e) => write!(f, "I/O error: {e}"),
            DualledError::Config(e) => write!(f, "Config error: {e}"),
            DualledError::Color(e) => write!(f, "Color error: {e}"),
            DualledError::Request(e) => write!(f, "Invalid request: {e}"),
        }
    }
}

impl std::error::Error for DualledError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DualledError::Sink(e) => Some(e),
            DualledError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SinkError> for DualledError {
    fn from(e: SinkError) -> Self {
        DualledError::Sink(e)
    }
}

impl From<std::io::Error> for DualledError {
    fn from(e: std::io::Error) -> Self {
        DualledError::Io(e)
    }
}

/// Crate-level Result alias using [`DualledError`].
pub type Result<T> = std::result::Result<T, DualledError>;
