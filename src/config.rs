//! Configuration loaded from `config.json`
//!
//! The file must provide `api_key`. `base_url`, `cache_capacity` and
//! `cache_ttl_secs` are optional and default to the public Fast Forex host and
//! a 200-entry, five-minute cache.

use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::data::fastforex::FAST_FOREX_BASE_URL;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file at any searched location
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// File exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File is not valid JSON or has wrongly typed fields
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `api_key` is absent or blank
    #[error("{0} does not contain an api_key")]
    MissingApiKey(PathBuf),

    /// `cache_capacity` is zero
    #[error("cache_capacity must be at least 1")]
    InvalidCapacity,
}

/// Raw shape of `config.json`
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    cache_capacity: Option<usize>,
    #[serde(default)]
    cache_ttl_secs: Option<u64>,
}

/// Validated runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub cache_capacity: NonZeroUsize,
    pub cache_ttl: Duration,
}

impl Config {
    /// Loads configuration from an explicit path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()))
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::parse(&content, path)
    }

    /// Loads `config.json` from the working directory, falling back to the
    /// platform config directory (`~/.config/fxconvert/` on Linux).
    pub fn discover() -> Result<Self, ConfigError> {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(&local);
        }

        match user_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Err(ConfigError::NotFound(local)),
        }
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let api_key = file
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(path.to_path_buf()))?;

        let cache_capacity = NonZeroUsize::new(file.cache_capacity.unwrap_or(DEFAULT_CAPACITY))
            .ok_or(ConfigError::InvalidCapacity)?;

        Ok(Self {
            api_key,
            base_url: file
                .base_url
                .unwrap_or_else(|| FAST_FOREX_BASE_URL.to_string()),
            cache_capacity,
            cache_ttl: file
                .cache_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TTL),
        })
    }
}

/// Location of `config.json` in the user's config directory, if one exists
pub fn user_config_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "fxconvert")?;
    Some(project_dirs.config_dir().join(DEFAULT_CONFIG_FILE))
}
