//! Pool Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A pool error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The operating system refused to start a worker thread.
    #[display("failed to spawn worker thread")]
    Spawn,
    /// The pool has been stopped; it no longer accepts work.
    #[display("submission to a stopped worker pool")]
    Stopped,
    /// The task panicked while running on a worker.
    #[display("task panicked: {_0}")]
    TaskPanicked(#[error(not(source))] String),
    /// The task was dropped without ever reporting completion.
    #[display("task completion handle disconnected")]
    Disconnected,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Stopped.to_string(), "submission to a stopped worker pool");
        assert_eq!(ErrorKind::TaskPanicked("boom".to_string()).to_string(), "task panicked: boom");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Spawn.is_retryable());
        assert!(!ErrorKind::Stopped.is_retryable());
        assert!(!ErrorKind::Disconnected.is_retryable());
    }
}
