//! Command-line arguments.

use clap::{ArgAction, Parser};
use hashscan_hash::HashAlgorithm;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "hashscan", version, about = "Scan a directory tree for files matching known-bad hashes")]
pub struct Cli {
    /// Directory to scan
    #[arg(long, value_name = "DIR")]
    pub path: PathBuf,

    /// Signature database (`hash;verdict` per line)
    #[arg(long, value_name = "CSV")]
    pub base: Option<PathBuf>,

    /// Append detections to this JSON-lines file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Worker threads (0 = available parallelism)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Digest used to fingerprint files: md5, sha256 or blake3
    #[arg(long, value_name = "NAME", value_parser = parse_algorithm)]
    pub algorithm: Option<HashAlgorithm>,

    /// Additional configuration file (TOML, YAML or JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Descend into symlinked directories
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// The configuration layer contributed by command-line flags. Unset flags
/// are omitted so they never shadow lower layers.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detections_log: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<HashAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_symlinks: Option<bool>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            threads: self.threads,
            database: self.base.clone(),
            detections_log: self.log.clone(),
            algorithm: self.algorithm,
            follow_symlinks: self.follow_symlinks.then_some(true),
        }
    }
}

fn parse_algorithm(value: &str) -> Result<HashAlgorithm, String> {
    value.parse().map_err(|err: hashscan_hash::error::Error| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_minimal_arguments() {
        let cli = Cli::try_parse_from(["hashscan", "--path", "/srv"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("/srv"));
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.overrides(), Overrides::default());
    }

    #[test]
    fn test_full_arguments() {
        let cli = Cli::try_parse_from([
            "hashscan",
            "--path",
            "/srv",
            "--base",
            "base.csv",
            "--log",
            "out.jsonl",
            "--threads",
            "4",
            "--algorithm",
            "SHA-256",
            "--follow-symlinks",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.overrides(),
            Overrides {
                threads: Some(4),
                database: Some(PathBuf::from("base.csv")),
                detections_log: Some(PathBuf::from("out.jsonl")),
                algorithm: Some(HashAlgorithm::Sha256),
                follow_symlinks: Some(true),
            }
        );
    }

    #[rstest]
    #[case(&["hashscan"])]
    #[case(&["hashscan", "--path", "/srv", "--algorithm", "crc32"])]
    #[case(&["hashscan", "--path", "/srv", "--threads", "-1"])]
    fn test_rejected_arguments(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }
}
