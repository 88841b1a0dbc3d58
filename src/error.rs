//! Error types for the Xyston library.
//!
//! All errors are represented by the [`XystonError`] enum. Note that the
//! ranking path itself never surfaces these to callers: store failures
//! degrade to documented defaults at the collaborator boundary, so
//! [`XystonError`] only travels through construction, CLI, and test code.

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Xyston operations.
#[derive(Error, Debug)]
pub enum XystonError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Inverted-index errors (open failures, corrupt tables)
    #[error("Index error: {0}")]
    Index(String),

    /// Metadata store errors (open failures, bad schema)
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Analysis-related errors (tokenization)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Operation cancelled
    #[error("Operation cancelled: {0}")]
    OperationCancelled(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with XystonError.
pub type Result<T> = std::result::Result<T, XystonError>;

impl XystonError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        XystonError::Index(msg.into())
    }

    /// Create a new metadata error.
    pub fn metadata<S: Into<String>>(msg: S) -> Self {
        XystonError::Metadata(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        XystonError::Analysis(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        XystonError::Storage(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        XystonError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        XystonError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new cancelled error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        XystonError::OperationCancelled(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = XystonError::index("Test index error");
        assert_eq!(error.to_string(), "Index error: Test index error");

        let error = XystonError::metadata("Test metadata error");
        assert_eq!(error.to_string(), "Metadata error: Test metadata error");

        let error = XystonError::analysis("Test analysis error");
        assert_eq!(error.to_string(), "Analysis error: Test analysis error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let xyston_error = XystonError::from(io_error);

        match xyston_error {
            XystonError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
