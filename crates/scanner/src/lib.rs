//! Concurrent signature scanning.
//!
//! A [`Scanner`] walks a directory tree on one producer thread and fans
//! every regular file out to a [`WorkerPool`](hashscan_pool::WorkerPool).
//! Each worker fingerprints the file with a [`Hasher`], looks the
//! fingerprint up in a [`SignatureDatabase`] and hands any match to a
//! [`DetectionLogger`]. The three collaborators are traits so the engine
//! can be driven by real implementations (see the `hashscan-hash`,
//! `hashscan-signatures` and `hashscan-report` crates) or by the in-memory
//! doubles behind the `mock` feature.
//!
//! Scanning never fails as a whole: problems are counted in the returned
//! [`ScanResult`] and reported through `tracing`.

pub mod error;
mod job;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod models;
mod result;
mod scan;
mod traits;
mod walk;

pub use crate::models::{Detection, FileOutcome, Fingerprint, Verdict};
pub use crate::result::ScanResult;
pub use crate::scan::{Scanner, ScannerConfig};
pub use crate::traits::{DatabaseHandle, DetectionLogger, Hasher, HasherHandle, LoggerHandle, SignatureDatabase};
pub use crate::walk::WalkOptions;
