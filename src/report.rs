//! Scan report rendering.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use hashscan_scanner::ScanResult;
use serde::Serialize;
use std::io::Write;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Serialize)]
struct JsonReport {
    path: String,
    files_processed: u64,
    malicious_detected: u64,
    errors: u64,
    elapsed_ms: u64,
    started_at: String,
    finished_at: String,
}

impl JsonReport {
    fn new(result: &ScanResult) -> Result<Self> {
        Ok(Self {
            path: result.root.to_string_lossy().into_owned(),
            files_processed: result.files_processed,
            malicious_detected: result.malicious_detected,
            errors: result.errors,
            elapsed_ms: u64::try_from(result.elapsed.as_millis()).unwrap_or(u64::MAX),
            started_at: result.started_at.format(&Rfc3339).or_raise(|| ErrorKind::Output)?,
            finished_at: result.finished_at.format(&Rfc3339).or_raise(|| ErrorKind::Output)?,
        })
    }
}

pub fn render(result: &ScanResult, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(&JsonReport::new(result)?).or_raise(|| ErrorKind::Output)
    } else {
        Ok(result.to_string())
    }
}

pub fn print(result: &ScanResult, json: bool) -> Result<()> {
    let rendered = render(result, json)?;
    writeln!(std::io::stdout().lock(), "{rendered}").or_raise(|| ErrorKind::Output)
}
