use hashscan_scanner::{DetectionLogger, Fingerprint, Verdict};
use std::path::Path;

/// Reports detections as `warn` events instead of writing them anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl DetectionLogger for TracingLogger {
    fn log_detection(&self, path: &Path, fingerprint: &Fingerprint, verdict: &Verdict) -> hashscan_scanner::error::Result<()> {
        tracing::warn!(path = %path.display(), hash = %fingerprint, %verdict, "Detection");
        Ok(())
    }
}
