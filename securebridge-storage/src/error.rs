//! Storage error types.

use thiserror::Error;

/// Result type for record store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in record store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("DuckDB error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("integer out of range: {0}")]
    OutOfRange(i64),
}
