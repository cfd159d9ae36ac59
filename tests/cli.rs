use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const HELLO_WORLD_MD5: &str = "5eb63bbbe01eeed093cb22bb8f5acdc3";
const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    /// A tree with one "Exploit", one "Dropper" and three clean files, plus a
    /// matching signature database.
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("nested/deeper")).unwrap();
        fs::write(tree.join("evil.exe"), "hello world").unwrap();
        fs::write(tree.join("nested/empty.dll"), "").unwrap();
        fs::write(tree.join("clean-1.txt"), "nothing").unwrap();
        fs::write(tree.join("nested/clean-2.txt"), "to see").unwrap();
        fs::write(tree.join("nested/deeper/clean-3.txt"), "here").unwrap();
        fs::write(
            dir.path().join("base.csv"),
            format!("{HELLO_WORLD_MD5};Exploit\n{EMPTY_MD5};Dropper\nthis line is malformed\n"),
        )
        .unwrap();
        fs::create_dir(dir.path().join("xdg")).unwrap();
        Self { dir }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// A command isolated from the user's configuration and environment.
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("hashscan");
        cmd.env("XDG_CONFIG_HOME", self.path("xdg"))
            .env_remove("RUST_LOG")
            .env_remove("HASHSCAN_DATABASE")
            .env_remove("HASHSCAN_DETECTIONS_LOG")
            .env_remove("HASHSCAN_THREADS")
            .env_remove("HASHSCAN_ALGORITHM")
            .env_remove("HASHSCAN_FOLLOW_SYMLINKS");
        cmd
    }
}

fn read_log(path: &Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_scan_reports_detections() {
    let fixture = Fixture::new();
    let log = fixture.path("detections.jsonl");
    fixture
        .cmd()
        .arg("--path")
        .arg(fixture.path("tree"))
        .arg("--base")
        .arg(fixture.path("base.csv"))
        .arg("--log")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Scan Report ---"))
        .stdout(predicate::str::contains("Processed files: 5"))
        .stdout(predicate::str::contains("Malicious detections: 2"))
        .stdout(predicate::str::contains("Errors: 0"));

    let mut verdicts: Vec<String> = read_log(&log)
        .iter()
        .map(|line| line["verdict"].as_str().unwrap().to_string())
        .collect();
    verdicts.sort();
    assert_eq!(verdicts, ["Dropper", "Exploit"]);
}

#[test]
fn test_json_report() {
    let fixture = Fixture::new();
    let output = fixture
        .cmd()
        .arg("--path")
        .arg(fixture.path("tree"))
        .arg("--base")
        .arg(fixture.path("base.csv"))
        .args(["--threads", "2", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files_processed"], 5);
    assert_eq!(report["malicious_detected"], 2);
    assert_eq!(report["errors"], 0);
}

#[test]
fn test_algorithm_must_match_database() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("--path")
        .arg(fixture.path("tree"))
        .arg("--base")
        .arg(fixture.path("base.csv"))
        .args(["--algorithm", "sha256"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Malicious detections: 0"));
}

#[test]
fn test_configuration_file_supplies_database() {
    let fixture = Fixture::new();
    let config = fixture.path("hashscan.toml");
    fs::write(
        &config,
        format!("database = {:?}\nthreads = 1\n", fixture.path("base.csv").display().to_string()),
    )
    .unwrap();
    fixture
        .cmd()
        .arg("--path")
        .arg(fixture.path("tree"))
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Malicious detections: 2"));
}

#[test]
fn test_environment_supplies_database() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("--path")
        .arg(fixture.path("tree"))
        .env("HASHSCAN_DATABASE", fixture.path("base.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed files: 5"));
}

#[test]
fn test_missing_scan_path_fails() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("--path")
        .arg(fixture.path("does-not-exist"))
        .arg("--base")
        .arg(fixture.path("base.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid path"));
}

#[test]
fn test_missing_database_fails() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("--path")
        .arg(fixture.path("tree"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("signature database"));

    fixture
        .cmd()
        .arg("--path")
        .arg(fixture.path("tree"))
        .arg("--base")
        .arg(fixture.path("missing.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid path"));
}

#[test]
fn test_log_directory_must_exist() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("--path")
        .arg(fixture.path("tree"))
        .arg("--base")
        .arg(fixture.path("base.csv"))
        .arg("--log")
        .arg(fixture.path("missing-dir/detections.jsonl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid path"));
}

#[test]
fn test_unknown_algorithm_is_usage_error() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("--path")
        .arg(fixture.path("tree"))
        .args(["--algorithm", "crc32"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported hash algorithm"));
}
