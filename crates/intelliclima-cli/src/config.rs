//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use intelliclima_core::config::DEFAULT_BASE_URL;
use intelliclima_core::{ApiConfig, ApiFolder, DeviceIdField, RetryConfig};
use serde::{Deserialize, Serialize};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Vendor server root
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// API tree: mono or multi
    #[serde(default)]
    pub api_folder: ApiFolder,

    /// Request field for device ids in a device sync: ecos or ids
    #[serde(default)]
    pub device_id_field: DeviceIdField,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries per device when a send fails
    #[serde(default)]
    pub retries: u32,

    /// Directory for tokens.json and houses.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_server_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            api_folder: ApiFolder::default(),
            device_id_field: DeviceIdField::default(),
            timeout_secs: default_timeout_secs(),
            retries: 0,
            data_dir: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("intelliclima")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match Self::load_from(&path) {
                Ok(config) => return config,
                Err(e) => eprintln!("Warning: {:#}", e),
            }
        }
        Self::default()
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Client settings derived from this config.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::with_base_url(&self.server_url)
            .api_folder(self.api_folder)
            .device_id_field(self.device_id_field)
            .timeout(Duration::from_secs(self.timeout_secs))
    }

    /// Retry policy for sends; `override_retries` wins over the file.
    pub fn retry_config(&self, override_retries: Option<u32>) -> RetryConfig {
        match override_retries.unwrap_or(self.retries) {
            0 => RetryConfig::none(),
            n => RetryConfig::new(n),
        }
    }

    /// Data directory: explicit argument, then config, then platform default.
    pub fn data_dir(&self, arg: Option<&Path>) -> PathBuf {
        arg.map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(intelliclima_store::default_data_dir)
    }
}
