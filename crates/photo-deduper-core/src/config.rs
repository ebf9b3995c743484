use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::KeeperRule;

/// Upper bound for an explicit thread count
const MAX_THREADS: usize = 256;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration for one deduplication pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory whose photos are deduplicated (not recursive)
    pub directory: PathBuf,

    /// Whether to run without making changes
    pub dry_run: bool,

    /// Which member of a duplicate group is kept
    pub keeper_rule: KeeperRule,

    /// Number of threads to use for hashing (0 = auto)
    pub threads: usize,

    /// Whether to draw a progress bar while hashing
    pub show_progress: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Directory for rolling log files; console logging when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir().unwrap_or_else(|| PathBuf::from("Pictures")),
            dry_run: false,
            keeper_rule: KeeperRule::ScanOrder,
            threads: 0, // Auto
            show_progress: true,
            log_level: LogLevel::Info,
            log_dir: None,
        }
    }
}

impl Config {
    /// Configuration for `directory` with every other value at its default
    pub fn for_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "A directory to scan must be specified".to_string(),
            ));
        }

        if self.threads > MAX_THREADS {
            return Err(Error::Configuration(format!(
                "Thread count must be at most {}, got {}",
                MAX_THREADS, self.threads
            )));
        }

        Ok(())
    }

    /// Number of hashing threads after resolving `0` to the CPU count
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get().max(1)
        } else {
            self.threads
        }
    }
}
