//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, so a calendar or configuration failure deep in a
//! schedule computation surfaces unchanged at the runner.

use thiserror::Error;

/// The top-level error type for `cs-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid run or primitive parameters, detected before time advances.
    #[error("configuration error: {0}")]
    Config(String),

    /// A wait or start delay that is negative or not a finite number.
    #[error("invalid delay {0}: delays must be finite and non-negative")]
    InvalidDelay(f64),

    /// A tick that cannot be represented as a calendar time (or vice versa).
    #[error("time conversion error: {0}")]
    Time(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `cs-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
