//! Report Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A detection sink error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for detection sink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The log file could not be opened for appending
    #[display("cannot open detection log: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// A record could not be written out
    #[display("failed to write detection log")]
    Write,
    /// A record could not be encoded
    #[display("failed to encode detection record")]
    Serialize,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Write)
    }
}
