//! Storage errors.

use thiserror::Error;

/// Errors raised by the SQLite store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error while replacing a database file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database file does not exist.
    #[error("Database not found: {path}")]
    NotFound {
        /// The missing path.
        path: String,
    },
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
