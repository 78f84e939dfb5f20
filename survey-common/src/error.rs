//! Common error types for the survey backend

use thiserror::Error;

/// Common result type for survey operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the store and the HTTP layer
#[derive(Error, Debug)]
pub enum Error {
    /// Requested participant record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored document could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
