use crate::error::SplitError;
use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Maximum number of exchanges kept in a single log file.
pub const MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(850) {
    Some(n) => n,
    None => panic!("MAX_ENTRIES must be non-zero"),
};

/// chrono pattern for `appLog-YYYY-MM-DD-hh-mm-ss.log`.
pub const NAME_FORMAT: &str = "appLog-%Y-%m-%d-%H-%M-%S.log";
/// Shape of a valid file name; `#` stands for a single ASCII digit.
pub const NAME_TEMPLATE: &str = "appLog-####-##-##-##-##-##.log";
pub const LOG_EXTENSION: &str = "log";

pub const TIME_TAG: &str = "Time:\t";
pub const SEND_TAG: &str = "Send:\t";
pub const RECEIVE_TAG: &str = "Receive: ";
/// chrono pattern for the value following [`TIME_TAG`], e.g. `16:25:16,934`.
pub const TIME_FORMAT: &str = "%H:%M:%S,%3f";

pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";

#[derive(Parser, Debug)]
#[clap(name = "odiag-split", version, about)]
pub struct Cli {
    /// Directory containing appLog-*.log files
    pub dir: PathBuf,

    /// Path to configuration file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Override maximum number of entries per output file
    #[clap(long)]
    pub max_entries: Option<NonZeroUsize>,

    /// Override suffix appended to split source files
    #[clap(long)]
    pub backup_suffix: Option<String>,

    /// Decode and split without writing or renaming anything
    #[clap(long)]
    pub dry_run: bool,

    /// Print a JSON summary of processed files to stdout
    #[clap(long)]
    pub json: bool,

    /// Log level (overridden by RUST_LOG)
    #[clap(long, default_value = "info")]
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub max_entries: NonZeroUsize,
    pub backup_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: MAX_ENTRIES,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => {
            let config_content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;

            parse_config(&config_content)?
        }
        None => Config::default(),
    };

    // Apply CLI overrides
    if let Some(max_entries) = cli.max_entries {
        config.max_entries = max_entries;
    }

    if let Some(ref backup_suffix) = cli.backup_suffix {
        config.backup_suffix = backup_suffix.clone();
    }

    validate(&config)?;

    Ok(config)
}

fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).context("Failed to parse config file")
}

fn validate(config: &Config) -> Result<(), SplitError> {
    if config.backup_suffix.is_empty() {
        return Err(SplitError::Config(
            "backup_suffix must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["odiag-split"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn test_defaults_without_config_file() {
        let config = load_config(&cli(&["logs"])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_entries.get(), 850);
        assert_eq!(config.backup_suffix, ".backup");
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let config = parse_config("max_entries = 10\n").unwrap();
        assert_eq!(config.max_entries.get(), 10);
        assert_eq!(config.backup_suffix, DEFAULT_BACKUP_SUFFIX);
    }

    #[test]
    fn test_zero_max_entries_is_rejected() {
        assert!(parse_config("max_entries = 0\n").is_err());
        assert!(Cli::try_parse_from(["odiag-split", "--max-entries", "0", "logs"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_entries = 10\nbackup_suffix = \".orig\"\n").unwrap();

        let config = load_config(&cli(&[
            "--config",
            path.to_str().unwrap(),
            "--max-entries",
            "3",
            "logs",
        ]))
        .unwrap();

        assert_eq!(config.max_entries.get(), 3);
        assert_eq!(config.backup_suffix, ".orig");
    }

    #[test]
    fn test_empty_backup_suffix_is_rejected() {
        let err = load_config(&cli(&["--backup-suffix", "", "logs"])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SplitError>(),
            Some(SplitError::Config(_))
        ));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        assert!(load_config(&cli(&["--config", "/nonexistent/odiag.toml", "logs"])).is_err());
    }
}
