//! Collaborator interfaces.
//!
//! The scanner only knows these three one-method traits. Every method is
//! called concurrently from pool workers, hence the `Send + Sync` bounds;
//! implementations do their own locking where they need any.

use crate::error::Result;
use crate::models::{Fingerprint, Verdict};
use std::path::Path;
use std::sync::Arc;

pub type HasherHandle = Arc<dyn Hasher>;
pub type DatabaseHandle = Arc<dyn SignatureDatabase>;
pub type LoggerHandle = Arc<dyn DetectionLogger>;

/// Computes a content fingerprint for a file on disk.
pub trait Hasher: Send + Sync {
    /// Hash the full contents of `path`.
    ///
    /// Returns [`Hash`](crate::error::ErrorKind::Hash) when the file cannot
    /// be opened or read.
    fn hash_file(&self, path: &Path) -> Result<Fingerprint>;
}

/// Read-only mapping from fingerprint to verdict.
pub trait SignatureDatabase: Send + Sync {
    /// Look up a fingerprint; `Ok(None)` means "not a known-bad file".
    fn find(&self, fingerprint: &Fingerprint) -> Result<Option<Verdict>>;
}

/// Sink for detections.
///
/// Errors returned here are reported but never abort a scan.
pub trait DetectionLogger: Send + Sync {
    fn log_detection(&self, path: &Path, fingerprint: &Fingerprint, verdict: &Verdict) -> Result<()>;
}
