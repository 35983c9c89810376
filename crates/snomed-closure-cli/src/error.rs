//! Top-level error for the binary.

use std::path::PathBuf;

use snomed_closure::ClosureError;
use snomed_loader::Rf2Error;
use snomed_sqlite::StoreError;
use thiserror::Error;

/// Anything that can stop a command.
#[derive(Error, Debug)]
pub enum AppError {
    /// Reading the release failed.
    #[error(transparent)]
    Rf2(#[from] Rf2Error),

    /// Computing the closure failed.
    #[error(transparent)]
    Closure(#[from] ClosureError),

    /// Reading or writing the database failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No release directory on the command line or in `SNOMED_DATA_PATH`.
    #[error("No release directory given (pass one or set SNOMED_DATA_PATH)")]
    MissingReleaseDir,

    /// The output database path does not end in a file name.
    #[error("Cannot write database to {0}")]
    InvalidOutput(PathBuf),
}

/// Result type for command handlers.
pub type AppResult<T> = Result<T, AppError>;
