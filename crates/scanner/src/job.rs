//! Per-scan accounting.

use crate::error::Result;
use crate::models::FileOutcome;
use crate::result::ScanResult;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use time::OffsetDateTime;

/// Counters for one [`Scanner::scan`](crate::Scanner::scan) call.
///
/// Shared by `Arc` between the calling thread, the producer and every
/// consumer task of that call, and nothing else. The counters only ever
/// increase and have no ordering relative to each other; they are read once
/// in [`finish`](Self::finish), after the pool has been joined.
#[derive(Debug)]
pub(crate) struct ScanJob {
    root: PathBuf,
    files: AtomicU64,
    detections: AtomicU64,
    errors: AtomicU64,
    started: Instant,
    started_at: OffsetDateTime,
}

impl ScanJob {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: AtomicU64::new(0),
            detections: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            started: Instant::now(),
            started_at: OffsetDateTime::now_utc(),
        }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Account for one processed file. Every consumer task calls this
    /// exactly once, whatever the outcome.
    pub(crate) fn record(&self, path: &Path, outcome: Result<FileOutcome>) {
        match outcome {
            Ok(FileOutcome::Clean) => {},
            Ok(FileOutcome::Detected(verdict)) => {
                tracing::info!(path = %path.display(), %verdict, "Malicious file detected");
                self.detections.fetch_add(1, Ordering::Relaxed);
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = ?err, "Failed to process file");
                self.errors.fetch_add(1, Ordering::Relaxed);
            },
        }
        self.files.fetch_add(1, Ordering::Relaxed);
    }

    /// Account for a failure that is not tied to a single file (traversal,
    /// pool construction).
    pub(crate) fn record_failure(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters. Relaxed loads are enough: joining the workers
    /// happens-before this call.
    pub(crate) fn finish(&self) -> ScanResult {
        ScanResult {
            root: self.root.clone(),
            files_processed: self.files.load(Ordering::Relaxed),
            malicious_detected: self.detections.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            elapsed: self.started.elapsed(),
            started_at: self.started_at,
            finished_at: OffsetDateTime::now_utc(),
        }
    }
}
