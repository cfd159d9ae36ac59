//! Signature Database Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A signature database error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for signature database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The database file could not be opened
    #[display("cannot open signature database: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// The database could not be read to the end
    #[display("failed to read signature database")]
    Read,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Read)
    }
}
