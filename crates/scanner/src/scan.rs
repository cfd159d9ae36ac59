use crate::error::{ErrorKind, Result};
use crate::job::ScanJob;
use crate::models::FileOutcome;
use crate::result::ScanResult;
use crate::traits::{DatabaseHandle, HasherHandle, LoggerHandle};
use crate::walk::{WalkOptions, walk};
use exn::ResultExt;
use hashscan_pool::WorkerPool;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tracing::instrument;

/// Tuning knobs for a [`Scanner`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Worker threads per scan; `0` selects the available parallelism.
    pub threads: usize,
    pub walk: WalkOptions,
}

#[derive(Clone)]
struct Collaborators {
    hasher: HasherHandle,
    database: DatabaseHandle,
    logger: LoggerHandle,
}

/// Scans directory trees for files whose fingerprint is in a signature
/// database.
///
/// Each [`scan`](Self::scan) call builds its own worker pool and counters,
/// walks the tree on a dedicated producer thread while the pool processes
/// files as they are discovered, and returns once everything queued has
/// been processed. Per-file failures are counted, never propagated.
///
/// # Examples
///
/// ```no_run
/// use hashscan_scanner::{Scanner, ScannerConfig};
/// # use hashscan_scanner::{DatabaseHandle, HasherHandle, LoggerHandle};
/// # fn example(hasher: HasherHandle, database: DatabaseHandle, logger: LoggerHandle) {
/// let scanner = Scanner::new(hasher, database, logger, ScannerConfig::default());
/// let result = scanner.scan("/srv/uploads");
/// println!("{result}");
/// # }
/// ```
#[derive(Clone)]
pub struct Scanner {
    collaborators: Collaborators,
    config: ScannerConfig,
}

impl Scanner {
    pub fn new(hasher: HasherHandle, database: DatabaseHandle, logger: LoggerHandle, config: ScannerConfig) -> Self {
        Self {
            collaborators: Collaborators { hasher, database, logger },
            config,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scan every regular file below `root`.
    ///
    /// Never fails: an invalid root, a traversal that breaks part-way, or a
    /// worker pool that cannot start each add one to
    /// [`errors`](ScanResult::errors), and whatever was already queued is
    /// still processed before the result is returned.
    pub fn scan(&self, root: impl AsRef<Path>) -> ScanResult {
        self.scan_path(root.as_ref())
    }

    #[instrument(skip(self), fields(root = %root.display(), threads = self.config.threads))]
    fn scan_path(&self, root: &Path) -> ScanResult {
        self.run(root, |root, options, submit| walk(root, options, submit))
    }

    /// Drive one scan with `traverse` as the producer. `traverse` hands every
    /// file to `submit` and returns how many it submitted.
    fn run<W>(&self, root: &Path, traverse: W) -> ScanResult
    where
        W: FnOnce(&Path, WalkOptions, &mut dyn FnMut(PathBuf) -> Result<()>) -> Result<u64> + Send,
    {
        let job = Arc::new(ScanJob::new(root));
        tracing::info!("Scan started");

        match WorkerPool::new(self.config.threads) {
            Ok(pool) => {
                let traversal = thread::scope(|scope| {
                    let producer = thread::Builder::new()
                        .name("hashscan-walker".to_string())
                        .spawn_scoped(scope, || self.produce(&pool, &job, traverse));
                    match producer {
                        Ok(producer) => producer
                            .join()
                            .unwrap_or_else(|_| Err(exn::Exn::from(ErrorKind::Traversal(root.to_path_buf())))),
                        Err(err) => Err(err).or_raise(|| ErrorKind::Traversal(root.to_path_buf())),
                    }
                });
                // Blocks until every file the producer managed to queue has
                // been processed, whether or not traversal completed.
                pool.join();
                match traversal {
                    Ok(submitted) => tracing::debug!(submitted, "Traversal complete"),
                    Err(err) => {
                        tracing::error!(error = ?err, "Traversal ended early");
                        job.record_failure();
                    },
                }
            },
            Err(err) => {
                tracing::error!(error = ?err, "Could not start worker pool");
                job.record_failure();
            },
        }

        let result = job.finish();
        tracing::info!(
            files = result.files_processed,
            detections = result.malicious_detected,
            errors = result.errors,
            elapsed_ms = u64::try_from(result.elapsed.as_millis()).unwrap_or(u64::MAX),
            "Scan finished"
        );
        result
    }

    /// Producer: queue one consumer task per file `traverse` discovers.
    fn produce<W>(&self, pool: &WorkerPool, job: &Arc<ScanJob>, traverse: W) -> Result<u64>
    where
        W: FnOnce(&Path, WalkOptions, &mut dyn FnMut(PathBuf) -> Result<()>) -> Result<u64>,
    {
        let mut submit = |path: PathBuf| -> Result<()> {
            let job = Arc::clone(job);
            let collaborators = self.collaborators.clone();
            let _ = pool
                .submit(move || {
                    let outcome = contain_panic(&path, || inspect_file(&collaborators, &path));
                    job.record(&path, outcome);
                })
                .or_raise(|| ErrorKind::Pool)?;
            Ok(())
        };
        traverse(job.root(), self.config.walk, &mut submit)
    }
}

/// Run one file's processing so that a panicking collaborator becomes an
/// error for that file instead of skipping its accounting.
fn contain_panic<F>(path: &Path, inspect: F) -> Result<FileOutcome>
where
    F: FnOnce() -> Result<FileOutcome>,
{
    panic::catch_unwind(AssertUnwindSafe(inspect)).unwrap_or_else(|_| {
        tracing::error!(path = %path.display(), "File processing panicked");
        Err(exn::Exn::from(ErrorKind::Panicked(path.to_path_buf())))
    })
}

/// Consumer: fingerprint one file and look it up.
///
/// Hashing and lookup failures are returned for the caller to count. A
/// logger failure is only reported; the file is still a detection.
fn inspect_file(collaborators: &Collaborators, path: &Path) -> Result<FileOutcome> {
    let fingerprint = collaborators.hasher.hash_file(path)?;
    let Some(verdict) = collaborators.database.find(&fingerprint)? else {
        return Ok(FileOutcome::Clean);
    };
    if let Err(err) = collaborators.logger.log_detection(path, &fingerprint, &verdict) {
        tracing::warn!(path = %path.display(), error = ?err, "Failed to record detection");
    }
    Ok(FileOutcome::Detected(verdict))
}
