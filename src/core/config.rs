//! Configuration management with layered hierarchy

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::filter::DEFAULT_CAPACITY;

/// File name of the snippet store inside the data directory
pub const DEFAULT_DB_FILE: &str = "snippets.db";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    #[diagnostic(code(snipbar::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}")]
    #[diagnostic(
        code(snipbar::config::parse),
        help("The file must be a YAML mapping of database, cache_enabled, cache_capacity, default_format")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("Invalid value '{value}' for {name}")]
    #[diagnostic(code(snipbar::config::env))]
    InvalidEnv { name: &'static str, value: String },
}

/// snipbar configuration with layered hierarchy
///
/// Every field is optional so that layers only override what they set;
/// accessors fill in the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the snippet store
    pub database: Option<PathBuf>,

    /// Memoize category filter results
    pub cache_enabled: Option<bool>,

    /// Number of category result sets kept in the cache
    pub cache_capacity: Option<usize>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::global_config_path().as_deref(), |name| {
            std::env::var(name).ok()
        })
    }

    /// Load from an explicit global file and environment lookup
    pub fn load_from<F>(global: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 1. Built-in defaults (applied by the accessors)
        let mut config = Config::default();

        // 2. Global user config (~/.config/snipbar/config.yaml)
        if let Some(path) = global {
            if path.exists() {
                config.merge(Self::read_file(path)?);
            }
        }

        // 3. Environment variables
        config.merge(Self::from_env(env)?);

        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_env<F>(env: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(db) = env("SNIPBAR_DB").filter(|v| !v.is_empty()) {
            config.database = Some(PathBuf::from(db));
        }
        if let Some(raw) = env("SNIPBAR_CACHE") {
            config.cache_enabled = Some(parse_flag(&raw).ok_or(ConfigError::InvalidEnv {
                name: "SNIPBAR_CACHE",
                value: raw.clone(),
            })?);
        }
        if let Some(raw) = env("SNIPBAR_CACHE_CAPACITY") {
            let capacity = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "SNIPBAR_CACHE_CAPACITY",
                value: raw.clone(),
            })?;
            config.cache_capacity = Some(capacity);
        }

        Ok(config)
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "snipbar")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.cache_enabled.is_some() {
            self.cache_enabled = other.cache_enabled;
        }
        if other.cache_capacity.is_some() {
            self.cache_capacity = other.cache_capacity;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Apply command-line overrides, the highest priority layer
    pub fn with_overrides(mut self, database: Option<PathBuf>, no_cache: bool) -> Self {
        if database.is_some() {
            self.database = database;
        }
        if no_cache {
            self.cache_enabled = Some(false);
        }
        self
    }

    /// Resolved store path, defaulting to the user data directory
    pub fn database_path(&self) -> PathBuf {
        if let Some(ref path) = self.database {
            return path.clone();
        }
        directories::ProjectDirs::from("", "", "snipbar")
            .map(|dirs| dirs.data_dir().join(DEFAULT_DB_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled.unwrap_or(true)
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity.unwrap_or(DEFAULT_CAPACITY)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
