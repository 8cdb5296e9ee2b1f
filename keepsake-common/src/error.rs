//! Common error types for keepsake

use thiserror::Error;

/// Common result type for keepsake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the keepsake crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record with the same id already exists in the object store
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Requested record or entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The object store container could not be read or written
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Invalid user input (missing field, oversized or wrong-type file)
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The song database could not be reached
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),
}
