//! Value types passed between the scanner and its collaborators.

use derive_more::Display;
use std::path::PathBuf;

/// Hex digest of a file's contents, used as the signature lookup key.
///
/// Always stored lowercase and without surrounding whitespace, so digests
/// produced by a hasher compare equal to the same digest read from a
/// signature file regardless of how the file spelled it.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);
impl Fingerprint {
    pub fn new(hex: impl AsRef<str>) -> Self {
        Self(hex.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Classification label attached to a known-bad fingerprint (e.g. "Trojan").
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub struct Verdict(String);
impl Verdict {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for Verdict {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl From<String> for Verdict {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
impl AsRef<str> for Verdict {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A file whose fingerprint matched the signature database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
    pub verdict: Verdict,
}

/// What happened to a single file once it was fingerprinted and looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// No signature matched.
    Clean,
    /// A signature matched; the detection has been handed to the logger.
    Detected(Verdict),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5EB63BBBE01EEED093CB22BB8F5ACDC3", "5eb63bbbe01eeed093cb22bb8f5acdc3")]
    #[case("  abc123\r\n", "abc123")]
    #[case("", "")]
    fn test_fingerprint_normalized(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Fingerprint::new(input).as_str(), expected);
        assert_eq!(Fingerprint::from(input.to_string()), Fingerprint::from(expected));
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::from("Exploit").to_string(), "Exploit");
        assert_eq!(Fingerprint::from("AB").to_string(), "ab");
    }
}
