mod builder;
mod cli;
mod error;
mod logging;
mod report;

use crate::builder::ScannerBuilder;
use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::{OptionExt, ResultExt};
use figment::providers::Serialized;
use hashscan_config::Config;
use hashscan_scanner::Scanner;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = ?err, "Scan aborted");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        },
    }
}

/// Scan problems are part of the report; only setup failures are errors.
fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    tracing::debug!(?config, "Resolved configuration");
    require_dir(&cli.path)?;
    let scanner = build_scanner(&config)?;
    let result = scanner.scan(&cli.path);
    report::print(&result, cli.json)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let figment = Config::figment(cli.config.as_deref())
        .or_raise(|| ErrorKind::Config)?
        .merge(Serialized::defaults(cli.overrides()));
    Config::from_figment(&figment).or_raise(|| ErrorKind::Config)
}

fn build_scanner(config: &Config) -> Result<Scanner> {
    let database = config
        .database
        .as_deref()
        .ok_or_raise(|| ErrorKind::MissingDependency("signature database (--base)"))?;
    if !database.is_file() {
        exn::bail!(ErrorKind::InvalidPath(database.to_path_buf()));
    }
    let builder = ScannerBuilder::new()
        .with_csv_database(database)?
        .with_algorithm(config.algorithm)
        .with_threads(config.threads)
        .with_follow_symlinks(config.follow_symlinks);
    let builder = match config.detections_log.as_deref() {
        Some(log) => {
            require_parent_dir(log)?;
            builder.with_json_log(log)?
        },
        None => builder.with_tracing_log(),
    };
    builder.build()
}

fn require_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
    }
    Ok(())
}

fn require_parent_dir(path: &Path) -> Result<()> {
    match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        Some(parent) => require_dir(parent),
        None => Ok(()),
    }
}
