//! Common error types for UASA

use thiserror::Error;

/// Common result type for UASA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the roster transform and the store
///
/// Request validation lives in the API layer (`ApiError::BadRequest`).
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced class does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation on create
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Uploaded roster content could not be read or decoded
    #[error("Read error: {0}")]
    Read(String),

    /// Store unreachable or query failed (wraps sqlx::Error)
    #[error("Service error: {0}")]
    Service(#[from] sqlx::Error),

    /// Stored document could not be encoded or decoded
    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
