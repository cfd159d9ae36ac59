use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use hashscan_hash::{FileHasher, HashAlgorithm};
use hashscan_report::{JsonLinesLogger, TracingLogger};
use hashscan_scanner::{DatabaseHandle, HasherHandle, LoggerHandle, Scanner, ScannerConfig, WalkOptions};
use hashscan_signatures::CsvSignatureDatabase;
use std::path::Path;
use std::sync::Arc;

/// Assembles a [`Scanner`] from its collaborators.
///
/// Every collaborator is required; [`build`](Self::build) refuses to guess.
#[derive(Default)]
pub struct ScannerBuilder {
    hasher: Option<HasherHandle>,
    database: Option<DatabaseHandle>,
    logger: Option<LoggerHandle>,
    config: ScannerConfig,
}

impl ScannerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load signatures from a `hash;verdict` file.
    pub fn with_csv_database(self, path: impl AsRef<Path>) -> Result<Self> {
        let database = CsvSignatureDatabase::load(path.as_ref()).or_raise(|| ErrorKind::Build)?;
        Ok(self.with_database(Arc::new(database)))
    }

    pub fn with_database(mut self, database: DatabaseHandle) -> Self {
        self.database = Some(database);
        self
    }

    /// Append detections to a JSON-lines file.
    pub fn with_json_log(self, path: impl AsRef<Path>) -> Result<Self> {
        let logger = JsonLinesLogger::create(path.as_ref()).or_raise(|| ErrorKind::Build)?;
        Ok(self.with_logger(Arc::new(logger)))
    }

    /// Report detections through logging only.
    pub fn with_tracing_log(self) -> Self {
        self.with_logger(Arc::new(TracingLogger))
    }

    pub fn with_logger(mut self, logger: LoggerHandle) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_algorithm(self, algorithm: HashAlgorithm) -> Self {
        self.with_hasher(Arc::new(FileHasher::new(algorithm)))
    }

    pub fn with_hasher(mut self, hasher: HasherHandle) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    pub fn with_follow_symlinks(mut self, follow_symlinks: bool) -> Self {
        self.config.walk = WalkOptions { follow_symlinks };
        self
    }

    pub fn build(self) -> Result<Scanner> {
        let database = self
            .database
            .ok_or_raise(|| ErrorKind::MissingDependency("signature database"))?;
        let logger = self.logger.ok_or_raise(|| ErrorKind::MissingDependency("detection logger"))?;
        let hasher = self.hasher.ok_or_raise(|| ErrorKind::MissingDependency("file hasher"))?;
        Ok(Scanner::new(hasher, database, logger, self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashscan_scanner::mock::{MockDatabase, MockHasher, MockLogger};
    use rstest::rstest;
    use std::fs;

    fn complete() -> ScannerBuilder {
        ScannerBuilder::new()
            .with_hasher(Arc::new(MockHasher::new()))
            .with_database(Arc::new(MockDatabase::default()))
            .with_logger(Arc::new(MockLogger::default()))
    }

    #[test]
    fn test_build_complete() {
        let scanner = complete().with_threads(3).with_follow_symlinks(true).build().unwrap();
        assert_eq!(scanner.config().threads, 3);
        assert!(scanner.config().walk.follow_symlinks);
    }

    #[rstest]
    #[case::no_database(ScannerBuilder { database: None, ..complete() }, "signature database")]
    #[case::no_logger(ScannerBuilder { logger: None, ..complete() }, "detection logger")]
    #[case::no_hasher(ScannerBuilder { hasher: None, ..complete() }, "file hasher")]
    #[case::empty(ScannerBuilder::new(), "signature database")]
    fn test_build_requires_every_collaborator(#[case] builder: ScannerBuilder, #[case] missing: &str) {
        let err = builder.build().err().unwrap();
        assert!(matches!(&*err, ErrorKind::MissingDependency(name) if *name == missing));
    }

    #[test]
    fn test_real_collaborators_scan() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = temp_dir.path().join("tree");
        fs::create_dir(&tree).unwrap();
        fs::write(tree.join("evil.txt"), "hello world").unwrap();
        fs::write(tree.join("clean.txt"), "goodbye").unwrap();
        let base = temp_dir.path().join("base.csv");
        fs::write(&base, "5EB63BBBE01EEED093CB22BB8F5ACDC3;Exploit\n").unwrap();
        let log = temp_dir.path().join("detections.jsonl");

        let scanner = ScannerBuilder::new()
            .with_csv_database(&base)
            .unwrap()
            .with_json_log(&log)
            .unwrap()
            .with_algorithm(HashAlgorithm::Md5)
            .build()
            .unwrap();
        let result = scanner.scan(&tree);
        assert_eq!((result.files_processed, result.malicious_detected, result.errors), (2, 1, 0));
        let logged = fs::read_to_string(&log).unwrap();
        assert_eq!(logged.lines().count(), 1);
        assert!(logged.contains("\"verdict\":\"Exploit\""));
    }

    #[test]
    fn test_unusable_collaborator_paths() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = ScannerBuilder::new()
            .with_csv_database(temp_dir.path().join("missing.csv"))
            .err()
            .unwrap();
        assert!(matches!(&*err, ErrorKind::Build));
        let err = ScannerBuilder::new()
            .with_json_log(temp_dir.path().join("missing/log.jsonl"))
            .err()
            .unwrap();
        assert!(matches!(&*err, ErrorKind::Build));
    }
}
