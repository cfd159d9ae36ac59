//! CLI Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A command-line error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Configuration could not be loaded
    #[display("configuration error")]
    Config,
    /// A collaborator could not be constructed
    #[display("failed to set up scanner")]
    Build,
    /// A path given on the command line or in configuration is unusable
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// The scanner was built without a required collaborator
    #[display("missing {_0}")]
    MissingDependency(#[error(not(source))] &'static str),
    /// The report could not be written to stdout
    #[display("failed to write report")]
    Output,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Output)
    }
}
