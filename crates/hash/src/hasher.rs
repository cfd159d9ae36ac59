use crate::HashAlgorithm;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use hashscan_scanner::{Fingerprint, Hasher};
use md5::{Digest, Md5};
use sha2::Sha256;
use std::fs::File;
use std::io::{ErrorKind as IoErrorKind, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

enum State {
    Md5(Md5),
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}
impl State {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => State::Md5(Md5::new()),
            HashAlgorithm::Sha256 => State::Sha256(Sha256::new()),
            HashAlgorithm::Blake3 => State::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            State::Md5(h) => h.update(chunk),
            State::Sha256(h) => h.update(chunk),
            State::Blake3(h) => {
                h.update(chunk);
            },
        }
    }

    fn finalize(self) -> Fingerprint {
        let hex = match self {
            State::Md5(h) => format!("{:x}", h.finalize()),
            State::Sha256(h) => format!("{:x}", h.finalize()),
            State::Blake3(h) => h.finalize().to_hex().to_string(),
        };
        Fingerprint::from(hex)
    }
}

/// Fingerprints files by streaming their contents through a digest.
///
/// Stateless apart from the algorithm choice, so one instance can be shared
/// by every worker of a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileHasher {
    algorithm: HashAlgorithm,
}

impl FileHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash a file on disk, reading it in fixed-size chunks.
    pub fn hash_path(&self, path: impl AsRef<Path>) -> Result<Fingerprint> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|err| exn::Exn::from(ErrorKind::open(path, err)))?;
        let fingerprint = self.hash_reader(&mut file)?;
        tracing::trace!(path = %path.display(), %fingerprint, algorithm = %self.algorithm, "Hashed file");
        Ok(fingerprint)
    }

    /// Hash everything `reader` yields until EOF.
    pub fn hash_reader<R: Read>(&self, reader: &mut R) -> Result<Fingerprint> {
        let mut state = State::new(self.algorithm);
        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == IoErrorKind::Interrupted => continue,
                Err(err) => exn::bail!(ErrorKind::Io(err)),
            };
            state.update(&buffer[..read]);
        }
        Ok(state.finalize())
    }

    #[must_use]
    pub fn hash_bytes(&self, bytes: &[u8]) -> Fingerprint {
        let mut state = State::new(self.algorithm);
        state.update(bytes);
        state.finalize()
    }
}

impl Hasher for FileHasher {
    fn hash_file(&self, path: &Path) -> hashscan_scanner::error::Result<Fingerprint> {
        self.hash_path(path)
            .or_raise(|| hashscan_scanner::error::ErrorKind::Hash(path.to_path_buf()))
    }
}
