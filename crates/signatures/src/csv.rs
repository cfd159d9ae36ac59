use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use hashscan_scanner::{Fingerprint, SignatureDatabase, Verdict};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::instrument;

const SEPARATOR: char = ';';

/// In-memory signature set loaded from a semicolon-separated file.
///
/// Each non-empty line is `hash;verdict`:
///
/// ```text
/// 44d88612fea8a8f36de82e1278abb02f;EICAR-Test-File
/// 5eb63bbbe01eeed093cb22bb8f5acdc3;Exploit
/// ```
///
/// Lines that do not split into exactly two non-empty fields are skipped
/// with a warning. Hashes are matched case-insensitively; if a hash appears
/// more than once the last verdict wins. The map is immutable once loaded,
/// so lookups from many workers need no locking.
#[derive(Debug, Clone, Default)]
pub struct CsvSignatureDatabase {
    signatures: HashMap<Fingerprint, Verdict>,
}

impl CsvSignatureDatabase {
    /// Load signatures from a file on disk.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
        let database = Self::from_reader(BufReader::new(file))?;
        tracing::info!(signatures = database.len(), "Loaded signature database");
        Ok(database)
    }

    /// Parse signatures from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut signatures = HashMap::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.or_raise(|| ErrorKind::Read)?;
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(&line) {
                Some((fingerprint, verdict)) => {
                    signatures.insert(fingerprint, verdict);
                },
                None => tracing::warn!(line = line_number, "Skipping malformed signature line"),
            }
        }
        Ok(Self { signatures })
    }

    /// Replace the current signatures with the contents of `path`,
    /// returning how many were loaded.
    ///
    /// On error the existing signatures are left untouched.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        *self = Self::load(path)?;
        Ok(self.len())
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&Verdict> {
        self.signatures.get(fingerprint)
    }
}

fn parse_line(line: &str) -> Option<(Fingerprint, Verdict)> {
    let mut fields = line.split(SEPARATOR).map(str::trim);
    let (hash, verdict) = (fields.next()?, fields.next()?);
    if fields.next().is_some() || hash.is_empty() || verdict.is_empty() {
        return None;
    }
    Some((Fingerprint::new(hash), Verdict::new(verdict)))
}

impl FromIterator<(Fingerprint, Verdict)> for CsvSignatureDatabase {
    fn from_iter<I: IntoIterator<Item = (Fingerprint, Verdict)>>(iter: I) -> Self {
        Self {
            signatures: iter.into_iter().collect(),
        }
    }
}

impl SignatureDatabase for CsvSignatureDatabase {
    fn find(&self, fingerprint: &Fingerprint) -> hashscan_scanner::error::Result<Option<Verdict>> {
        Ok(self.get(fingerprint).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use std::io::Cursor;

    fn parse(contents: &str) -> CsvSignatureDatabase {
        CsvSignatureDatabase::from_reader(Cursor::new(contents)).unwrap()
    }

    #[test]
    fn test_load_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("base.csv");
        fs::write(&path, "5eb63bbbe01eeed093cb22bb8f5acdc3;Exploit\nd41d8cd98f00b204e9800998ecf8427e;Dropper\n").unwrap();
        let database = CsvSignatureDatabase::load(&path).unwrap();
        assert_eq!(database.len(), 2);
        assert_eq!(
            database.find(&Fingerprint::from("5eb63bbbe01eeed093cb22bb8f5acdc3")).unwrap(),
            Some(Verdict::from("Exploit"))
        );
        assert_eq!(database.find(&Fingerprint::from("0000")).unwrap(), None);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let database = parse(
            "hash1;Verdict1\n\
             \n\
             no-separator-here\n\
             ;missing-hash\n\
             missing-verdict;\n\
             too;many;fields\n\
             hash2;Verdict2\n",
        );
        assert_eq!(database.len(), 2);
        assert!(database.get(&Fingerprint::from("hash1")).is_some());
        assert!(database.get(&Fingerprint::from("hash2")).is_some());
    }

    #[rstest]
    #[case("  ABCDEF ; Trojan \r", "abcdef", "Trojan")]
    #[case("abcdef;Worm", "ABCDEF", "Worm")]
    fn test_fields_are_normalized(#[case] line: &str, #[case] lookup: &str, #[case] verdict: &str) {
        let database = parse(line);
        assert_eq!(database.get(&Fingerprint::from(lookup)), Some(&Verdict::from(verdict)));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let database = parse("aa;First\naa;Second\n");
        assert_eq!(database.len(), 1);
        assert_eq!(database.get(&Fingerprint::from("aa")), Some(&Verdict::from("Second")));
    }

    #[test]
    fn test_empty_input() {
        let database = parse("");
        assert!(database.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope.csv");
        let err = CsvSignatureDatabase::load(&missing).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Open(path) if path == &missing));
    }

    #[test]
    fn test_reload_replaces_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let first = temp_dir.path().join("first.csv");
        let second = temp_dir.path().join("second.csv");
        fs::write(&first, "aa;One\nbb;Two\n").unwrap();
        fs::write(&second, "cc;Three\n").unwrap();

        let mut database = CsvSignatureDatabase::load(&first).unwrap();
        assert_eq!(database.len(), 2);
        assert_eq!(database.reload(&second).unwrap(), 1);
        assert!(database.get(&Fingerprint::from("aa")).is_none());
        assert!(database.get(&Fingerprint::from("cc")).is_some());

        assert!(database.reload(temp_dir.path().join("missing.csv")).is_err());
        assert_eq!(database.len(), 1);
    }

    #[test]
    fn test_from_iterator() {
        let database: CsvSignatureDatabase = [(Fingerprint::from("AA"), Verdict::from("Exploit"))].into_iter().collect();
        assert_eq!(database.find(&Fingerprint::from("aa")).unwrap(), Some(Verdict::from("Exploit")));
    }
}
