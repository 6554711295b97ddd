//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --data-dir ./loja                                                  │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     ESTOQUE_DATA_DIR=/srv/estoque                                      │
//! │     ESTOQUE_CACHE_TTL_SECS=3                                           │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config path, or the platform config dir:                         │
//! │     ~/.config/estoque/estoque.toml (Linux)                             │
//! │     ~/Library/Application Support/com.estoque.estoque/estoque.toml     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # estoque.toml
//! [store]
//! data_dir = "/srv/estoque"
//! cache_ttl_secs = 3
//!
//! [display]
//! currency_symbol = "R$"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "estoque.toml";
pub const ENV_DATA_DIR: &str = "ESTOQUE_DATA_DIR";
pub const ENV_CACHE_TTL_SECS: &str = "ESTOQUE_CACHE_TTL_SECS";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[store]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Directory holding the table files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Read cache freshness window, seconds. 0 disables the cache.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "estoque", "estoque")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn default_cache_ttl() -> u64 {
    3
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            data_dir: default_data_dir(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

/// `[display]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Prefix for amounts in text output.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (estoque.toml); an explicit path must exist
    /// 3. Environment variables
    ///
    /// Command-line overrides are applied by the caller, then
    /// [`validate`](Self::validate) runs again.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Applies `ESTOQUE_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.store.data_dir = PathBuf::from(dir);
        }

        if let Some(ttl) = lookup(ENV_CACHE_TTL_SECS) {
            self.store.cache_ttl_secs = ttl.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} must be a whole number of seconds, got '{}'", ENV_CACHE_TTL_SECS, ttl))
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store.data_dir must not be empty".into()));
        }
        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.store.cache_ttl_secs)
    }
}
