use crate::compare::DEFAULT_TOP_N;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

const SYSTEM_CONFIG_PATH: &str = "/etc/faceratio/faceratio.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// External celebrity JSON; the built-in table is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
    #[serde(default = "default_save_results")]
    pub save_results: bool,
}

fn default_results_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("faceratio")
            .join("results"),
        None => PathBuf::from("results"),
    }
}

fn default_save_results() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
            save_results: default_save_results(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain:
    /// 1. /etc/faceratio/faceratio.toml (system-wide)
    /// 2. ~/.config/faceratio/faceratio.toml (user)
    /// 3. Compiled defaults
    ///
    /// Only a missing file falls through; a file that exists but cannot be
    /// read or parsed is an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_first(&Self::search_paths())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(
                PathBuf::from(home)
                    .join(".config")
                    .join("faceratio")
                    .join("faceratio.toml"),
            );
        }
        paths
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        for path in paths {
            match Self::read(path) {
                Ok(config) => {
                    log::info!("Using config {}", path.display());
                    config.validate()?;
                    return Ok(config);
                }
                Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    log::warn!("Failed to load config {}: {}", path.display(), e);
                    return Err(e);
                }
            }
        }

        log::debug!("No config file found, using defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a specific file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matching.top_n == 0 {
            return Err(ConfigError::Validation(
                "matching.top_n must be greater than 0".to_string(),
            ));
        }

        if let Some(path) = &self.dataset.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "dataset.path cannot be empty".to_string(),
                ));
            }
        }

        if self.storage.results_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage.results_path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
