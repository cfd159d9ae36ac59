//! Layered configuration.
//!
//! Sources are merged in increasing order of precedence:
//!
//! 1. built-in defaults ([`Config::default`]);
//! 2. the per-user `config.toml` in the platform config directory;
//! 3. an explicitly requested file (TOML, YAML or JSON, chosen by extension);
//! 4. `HASHSCAN_*` environment variables (`HASHSCAN_THREADS=4`);
//! 5. anything the caller merges on top of [`Config::figment`], typically
//!    command-line flags.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use hashscan_hash::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "HASHSCAN_";
const USER_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker threads per scan; `0` uses the available parallelism.
    pub threads: usize,
    /// Signature database (`hash;verdict` lines).
    pub database: Option<PathBuf>,
    /// JSON-lines file detections are appended to. Detections are only
    /// reported through logging when unset.
    pub detections_log: Option<PathBuf>,
    pub algorithm: HashAlgorithm,
    /// Descend into symlinked directories.
    pub follow_symlinks: bool,
}

impl Config {
    /// Load configuration from every standard source.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::from_figment(&Self::figment(explicit)?)
    }

    /// Build the layered figment without extracting it, so callers can merge
    /// further providers on top.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(user) = user_config_path().filter(|path| path.is_file()) {
            tracing::debug!(path = %user.display(), "Using user configuration");
            figment = figment.merge(Toml::file(user));
        }
        if let Some(path) = explicit {
            figment = merge_file(figment, path)?;
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|err| exn::Exn::from(ErrorKind::Invalid(err.to_string())))
    }
}

/// Location of the per-user configuration file, if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hashscan").map(|dirs| dirs.config_dir().join(USER_CONFIG_FILE))
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    if !path.is_file() {
        exn::bail!(ErrorKind::Invalid(format!("config file not found: {}", path.display())));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    tracing::debug!(path = %path.display(), "Using configuration file");
    match extension.as_str() {
        "toml" => Ok(figment.merge(Toml::file(path))),
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        "json" => Ok(figment.merge(Json::file(path))),
        _ => exn::bail!(ErrorKind::Invalid(format!(
            "unsupported config format: {}",
            path.display()
        ))),
    }
}
