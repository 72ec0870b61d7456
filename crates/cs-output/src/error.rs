//! Error types for cs-output.

use cs_core::CoreError;
use thiserror::Error;

/// Errors that can occur when writing observations.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The tick could not be rendered as a calendar time.
    #[error(transparent)]
    Time(#[from] CoreError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
