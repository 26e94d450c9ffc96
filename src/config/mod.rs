//! Configuration management

use crate::types::{
    normalize_extension, SyncError, SyncRequest, DEFAULT_FAILURE_BACKOFF, DEFAULT_QUEUE_CAPACITY,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "dirsync", version, about = "Mirror a directory tree with a pool of copy workers")]
pub struct Cli {
    /// Configuration file (JSON, or TOML when it ends in `.toml`)
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Override the configured worker count
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Never draw transfer progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Sync configuration as read from the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Destination directory
    pub destination: PathBuf,

    /// Append-only log of copied files
    #[serde(rename = "logfile")]
    pub log_file: PathBuf,

    /// Number of copy workers
    #[serde(rename = "worker", default = "default_workers")]
    pub workers: usize,

    /// Extensions that are never copied, e.g. `.pdf`
    #[serde(default)]
    pub skip_extensions: Vec<String>,

    /// Entries the walk may queue ahead of the workers
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Seconds a worker pauses after a failed copy
    #[serde(default = "default_failure_backoff_secs")]
    pub failure_backoff_secs: u64,
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_failure_backoff_secs() -> u64 {
    DEFAULT_FAILURE_BACKOFF.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            log_file: PathBuf::new(),
            workers: default_workers(),
            skip_extensions: Vec::new(),
            queue_capacity: default_queue_capacity(),
            failure_backoff_secs: default_failure_backoff_secs(),
        }
    }
}

impl Config {
    /// Load from `path`. TOML for `.toml` files, JSON otherwise.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Parse a JSON config
    pub fn from_json_str(content: &str) -> Result<Self, SyncError> {
        serde_json::from_str(content)
            .map_err(|e| SyncError::Config(format!("Invalid JSON config: {}", e)))
    }

    /// Parse a TOML config
    pub fn from_toml_str(content: &str) -> Result<Self, SyncError> {
        toml::from_str(content).map_err(|e| SyncError::Config(format!("Invalid TOML config: {}", e)))
    }

    /// Validate configuration
    ///
    /// Source existence is not checked; a missing source root is reported
    /// by the walk.
    pub fn validate(&self) -> Result<(), SyncError> {
        for (key, value) in [
            ("source", &self.source),
            ("destination", &self.destination),
            ("logfile", &self.log_file),
        ] {
            if value.as_os_str().is_empty() {
                return Err(SyncError::Config(format!("'{}' must not be empty", key)));
            }
        }

        if self.workers == 0 {
            return Err(SyncError::Config(
                "'worker' must be at least 1".to_string(),
            ));
        }

        if self.queue_capacity == 0 {
            return Err(SyncError::Config(
                "'queue_capacity' must be at least 1".to_string(),
            ));
        }

        if self.source == self.destination {
            return Err(SyncError::Config(
                "Source and destination cannot be the same".to_string(),
            ));
        }

        Ok(())
    }

    /// Skip list lowercased, each entry with a leading `.`
    pub fn normalized_skip_extensions(&self) -> Vec<String> {
        self.skip_extensions
            .iter()
            .filter_map(|ext| normalize_extension(ext))
            .collect()
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mut config = Config::load(&cli.config)?;
        if let Some(workers) = cli.workers {
            config.workers = workers;
        }
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<&Config> for SyncRequest {
    type Error = SyncError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(SyncRequest::new(
            &config.source,
            &config.destination,
            &config.log_file,
        )
        .workers(config.workers)
        .skip_extensions(config.normalized_skip_extensions())
        .queue_capacity(config.queue_capacity)
        .failure_backoff(Duration::from_secs(config.failure_backoff_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_JSON: &str = r#"{
        "source": "/data/src",
        "destination": "/mnt/share",
        "logfile": "/var/log/sync.log",
        "worker": 8,
        "skip_extensions": [".pdf", ".ISO"]
    }"#;

    #[test]
    fn test_parse_json_config() {
        let config = Config::from_json_str(SAMPLE_JSON).expect("parse config");
        assert_eq!(config.source, PathBuf::from("/data/src"));
        assert_eq!(config.destination, PathBuf::from("/mnt/share"));
        assert_eq!(config.log_file, PathBuf::from("/var/log/sync.log"));
        assert_eq!(config.workers, 8);
        assert_eq!(config.skip_extensions, vec![".pdf", ".ISO"]);
        assert_eq!(config.queue_capacity, 100);
        assert_eq!(config.failure_backoff_secs, 30);
    }

    #[test]
    fn test_parse_toml_config() {
        let config = Config::from_toml_str(
            r#"
            source = "src"
            destination = "dst"
            logfile = "sync.log"
            skip_extensions = ["mp4"]
            failure_backoff_secs = 5
            "#,
        )
        .expect("parse toml");
        assert_eq!(config.workers, 4);
        assert_eq!(config.failure_backoff_secs, 5);
        assert_eq!(config.normalized_skip_extensions(), vec![".mp4"]);
    }

    #[test]
    fn test_missing_required_key_is_config_error() {
        let result = Config::from_json_str(r#"{"source": "a", "destination": "b"}"#);
        assert!(matches!(result, Err(SyncError::Config(msg)) if msg.contains("logfile")));
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = Config::from_json_str(SAMPLE_JSON).expect("parse config");
        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_same_source_and_destination() {
        let mut config = Config::from_json_str(SAMPLE_JSON).expect("parse config");
        config.destination = config.source.clone();
        let err = config.validate().expect_err("same paths must be rejected");
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validate_does_not_require_existing_source() {
        let config = Config::from_json_str(SAMPLE_JSON).expect("parse config");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_request_from_config() {
        let config = Config::from_json_str(SAMPLE_JSON).expect("parse config");
        let request = SyncRequest::try_from(&config).expect("build request");
        assert_eq!(request.worker_count, 8);
        assert_eq!(request.failure_backoff, Duration::from_secs(30));
        assert!(request.skip_extensions.contains(".pdf"));
        assert!(request.skip_extensions.contains(".iso"));
    }

    #[test]
    fn test_load_picks_format_from_extension() {
        let dir = TempDir::new().expect("create tempdir");
        let json_path = dir.path().join("config.json");
        fs::write(&json_path, SAMPLE_JSON).expect("write json");
        let toml_path = dir.path().join("config.toml");
        fs::write(
            &toml_path,
            "source = \"/data/src\"\ndestination = \"/mnt/share\"\nlogfile = \"/var/log/sync.log\"\nworker = 8\nskip_extensions = [\".pdf\", \".ISO\"]\n",
        )
        .expect("write toml");

        let from_json = Config::load(&json_path).expect("load json");
        let from_toml = Config::load(&toml_path).expect("load toml");
        assert_eq!(from_json, from_toml);
    }

    #[test]
    fn test_cli_override_workers() {
        let dir = TempDir::new().expect("create tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, SAMPLE_JSON).expect("write json");

        let cli = Cli::parse_from(["dirsync", "--config", path.to_str().expect("utf-8"), "-j", "2"]);
        let config = Config::try_from(cli).expect("config from cli");
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = TempDir::new().expect("create tempdir");
        let result = Config::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(SyncError::Config(_))));
    }
}
