//! In-memory collaborators for tests.
//!
//! [`MockHasher`] fingerprints a file by its text contents, so a test can
//! make a file "match" a signature just by writing the signature into it.

use crate::error::{ErrorKind, Result};
use crate::models::{Detection, Fingerprint, Verdict};
use crate::traits::{DetectionLogger, Hasher, SignatureDatabase};
use exn::ResultExt;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct MockHasher {
    failing: HashSet<OsString>,
    calls: AtomicU64,
}

impl MockHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail for any file with this name, wherever it lives in the tree.
    pub fn failing_on(mut self, file_name: impl Into<OsString>) -> Self {
        self.failing.insert(file_name.into());
        self
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Hasher for MockHasher {
    fn hash_file(&self, path: &Path) -> Result<Fingerprint> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if path.file_name().is_some_and(|name| self.failing.contains(name)) {
            exn::bail!(ErrorKind::Hash(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).or_raise(|| ErrorKind::Hash(path.to_path_buf()))?;
        Ok(Fingerprint::new(contents))
    }
}

#[derive(Debug, Default)]
pub struct MockDatabase {
    entries: HashMap<Fingerprint, Verdict>,
    failing: HashSet<Fingerprint>,
}

impl MockDatabase {
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(hash, verdict)| (Fingerprint::from(hash), Verdict::from(verdict)))
                .collect(),
            failing: HashSet::new(),
        }
    }

    /// Fail lookups of this fingerprint instead of answering them.
    pub fn failing_on(mut self, fingerprint: &str) -> Self {
        self.failing.insert(Fingerprint::from(fingerprint));
        self
    }
}

impl SignatureDatabase for MockDatabase {
    fn find(&self, fingerprint: &Fingerprint) -> Result<Option<Verdict>> {
        if self.failing.contains(fingerprint) {
            exn::bail!(ErrorKind::Lookup);
        }
        Ok(self.entries.get(fingerprint).cloned())
    }
}

/// Records every detection it is handed.
#[derive(Debug, Default)]
pub struct MockLogger {
    detections: Mutex<Vec<Detection>>,
    fail: bool,
}

impl MockLogger {
    /// A logger whose every call fails.
    pub fn failing() -> Self {
        Self {
            detections: Mutex::default(),
            fail: true,
        }
    }

    pub fn detections(&self) -> Vec<Detection> {
        self.detections.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl DetectionLogger for MockLogger {
    fn log_detection(&self, path: &Path, fingerprint: &Fingerprint, verdict: &Verdict) -> Result<()> {
        if self.fail {
            exn::bail!(ErrorKind::Log(path.to_path_buf()));
        }
        let mut detections = self
            .detections
            .lock()
            .map_err(|_| exn::Exn::from(ErrorKind::Log(path.to_path_buf())))?;
        detections.push(Detection {
            path: path.to_path_buf(),
            fingerprint: fingerprint.clone(),
            verdict: verdict.clone(),
        });
        Ok(())
    }
}
