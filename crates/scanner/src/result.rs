use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use time::OffsetDateTime;

/// Final statistics of a completed scan.
///
/// Produced once, after the producer has finished and every queued file has
/// been processed, so the counters are mutually consistent:
/// `malicious_detected <= files_processed`, and every per-file error is
/// also counted in `files_processed`. A traversal failure adds one error
/// that does not correspond to any processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Directory the scan was asked to walk.
    pub root: PathBuf,
    pub files_processed: u64,
    pub malicious_detected: u64,
    pub errors: u64,
    /// Wall-clock time from scan start until the pool fully drained.
    pub elapsed: Duration,
    pub started_at: OffsetDateTime,
    pub finished_at: OffsetDateTime,
}

impl ScanResult {
    /// `true` if nothing matched the signature database.
    pub fn is_clean(&self) -> bool {
        self.malicious_detected == 0
    }

    /// `true` if every file was processed without error and traversal
    /// completed.
    pub fn is_complete(&self) -> bool {
        self.errors == 0
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Scan Report ---")?;
        writeln!(f, "Scanned path: {}", self.root.display())?;
        writeln!(f, "Processed files: {}", self.files_processed)?;
        writeln!(f, "Malicious detections: {}", self.malicious_detected)?;
        writeln!(f, "Errors: {}", self.errors)?;
        writeln!(f, "Execution time: {} ms", self.elapsed.as_millis())?;
        write!(f, "-------------------")
    }
}
