use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use hashscan_scanner::{DetectionLogger, Fingerprint, Verdict};
use serde::Serialize;
use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Serialize)]
struct Record<'a> {
    path: Cow<'a, str>,
    /// Set when `path` is not valid UTF-8 and was written with replacement
    /// characters.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    lossy: bool,
    hash: &'a str,
    verdict: &'a str,
}

/// Appends one JSON object per detection to a file.
///
/// ```text
/// {"path":"/srv/share/evil.exe","hash":"5eb63bbbe01eeed093cb22bb8f5acdc3","verdict":"Exploit"}
/// ```
///
/// Paths are written as UTF-8. A path that is not valid UTF-8 is written
/// with replacement characters and marked `"lossy":true`, so it cannot be
/// used to locate the file on disk.
///
/// Each record is encoded up front and written with a single call while the
/// file lock is held, so lines from concurrent workers never interleave.
#[derive(Debug)]
pub struct JsonLinesLogger {
    path: PathBuf,
    writer: Mutex<LineWriter<File>>,
}

impl JsonLinesLogger {
    /// Open (or create) `path` for appending. The parent directory must
    /// already exist.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
        tracing::debug!(path = %path.display(), "Opened detection log");
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(LineWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, path: &Path, fingerprint: &Fingerprint, verdict: &Verdict) -> Result<()> {
        let record = Record {
            path: path.to_string_lossy(),
            lossy: path.to_str().is_none(),
            hash: fingerprint.as_str(),
            verdict: verdict.as_str(),
        };
        let mut line = serde_json::to_vec(&record).or_raise(|| ErrorKind::Serialize)?;
        line.push(b'\n');
        let mut writer = self.lock();
        writer.write_all(&line).or_raise(|| ErrorKind::Write)?;
        writer.flush().or_raise(|| ErrorKind::Write)
    }

    fn lock(&self) -> MutexGuard<'_, LineWriter<File>> {
        // A panic mid-write can at worst leave a partial line behind.
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DetectionLogger for JsonLinesLogger {
    fn log_detection(&self, path: &Path, fingerprint: &Fingerprint, verdict: &Verdict) -> hashscan_scanner::error::Result<()> {
        self.write(path, fingerprint, verdict)
            .or_raise(|| hashscan_scanner::error::ErrorKind::Log(path.to_path_buf()))
    }
}
