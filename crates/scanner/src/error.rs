//! Scanner Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Collaborators ([`Hasher`](crate::Hasher),
//! [`SignatureDatabase`](crate::SignatureDatabase),
//! [`DetectionLogger`](crate::DetectionLogger)) raise these kinds on top of
//! their own error trees so the scanner can report them uniformly.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A scanner error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The scan root does not exist or is not a directory.
    #[display("invalid scan root: {}", _0.display())]
    InvalidRoot(#[error(not(source))] PathBuf),
    /// Directory traversal failed part-way through the tree.
    #[display("directory traversal failed at: {}", _0.display())]
    Traversal(#[error(not(source))] PathBuf),
    /// A file could not be fingerprinted.
    #[display("failed to hash file: {}", _0.display())]
    Hash(#[error(not(source))] PathBuf),
    /// The signature database could not answer a lookup.
    #[display("signature lookup failed")]
    Lookup,
    /// A detection could not be recorded.
    #[display("failed to log detection: {}", _0.display())]
    Log(#[error(not(source))] PathBuf),
    /// A collaborator panicked while processing this file.
    #[display("file processing panicked: {}", _0.display())]
    Panicked(#[error(not(source))] PathBuf),
    /// The worker pool refused or failed to run work.
    #[display("worker pool error")]
    Pool,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Hash(_) | Self::Log(_) | Self::Traversal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::InvalidRoot(PathBuf::from("/nope")).to_string(),
            "invalid scan root: /nope"
        );
        assert_eq!(ErrorKind::Lookup.to_string(), "signature lookup failed");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Hash(PathBuf::from("a")).is_retryable());
        assert!(!ErrorKind::InvalidRoot(PathBuf::from("a")).is_retryable());
        assert!(!ErrorKind::Lookup.is_retryable());
    }
}
