//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\artist-explorer\config.toml
//! - macOS: ~/Library/Application Support/artist-explorer/config.toml
//! - Linux: ~/.config/artist-explorer/config.toml
//!
//! Every field has a default, so a partial file (or none at all) is fine.
//! Command-line flags and environment variables override what is loaded here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{DEFAULT_API_BASE_URL, DEFAULT_TOKEN_URL, RetryPolicy};
use crate::explorer::{ExplorerConfig, FailurePolicy};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Client credentials for the catalog
    pub credentials: Credentials,

    /// Catalog endpoints and HTTP behaviour
    pub catalog: CatalogConfig,

    /// Traversal pacing and failure handling
    pub explorer: ExplorerSettings,
}

/// API credentials
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Catalog endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub api_base_url: String,
    pub token_url: String,

    /// Per-request timeout
    pub request_timeout_secs: u64,

    /// Attempts for transient network failures (1 = no retry)
    pub retry_attempts: u32,

    /// Delay between network retries
    pub retry_delay_secs: u64,

    /// Backoff used when a 429 carries no usable Retry-After
    pub default_retry_after_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            request_timeout_secs: 30,
            retry_attempts: 2,
            retry_delay_secs: 5,
            default_retry_after_secs: 5,
        }
    }
}

impl CatalogConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts.max(1),
            delay: Duration::from_secs(self.retry_delay_secs),
        }
    }

    pub fn default_retry_after(&self) -> Duration {
        Duration::from_secs(self.default_retry_after_secs)
    }
}

/// Exploration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerSettings {
    /// Featured collections to seed from (1-50)
    pub featured_limit: u32,

    /// Ids per several-artists lookup (1-50)
    pub batch_size: usize,

    /// Cool down every N catalog requests (0 = never)
    pub cooldown_every: u64,

    pub cooldown_secs: u64,

    /// "abort" or "skip"
    pub on_error: FailurePolicy,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        let defaults = ExplorerConfig::default();
        Self {
            featured_limit: defaults.featured_limit,
            batch_size: defaults.batch_size,
            cooldown_every: defaults.cooldown_every,
            cooldown_secs: defaults.cooldown.as_secs(),
            on_error: defaults.failure_policy,
        }
    }
}

impl ExplorerSettings {
    pub fn to_explorer_config(&self) -> ExplorerConfig {
        ExplorerConfig {
            featured_limit: self.featured_limit,
            batch_size: self.batch_size,
            cooldown_every: self.cooldown_every,
            cooldown: Duration::from_secs(self.cooldown_secs),
            failure_policy: self.on_error,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("artist-explorer"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path
///
/// Unlike [`load`], a missing or malformed file is an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to `path`, creating parent directories as needed
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Config file {0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
