//! Error types for snapshot storage operations.

use thiserror::Error;

/// Result type for snapshot storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing a snapshot document.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
