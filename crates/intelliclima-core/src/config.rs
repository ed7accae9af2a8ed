//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Production server of the IntelliClima cloud.
pub const DEFAULT_BASE_URL: &str = "https://intelliclima.fantinicosmi.it";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// API tree on the vendor server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFolder {
    /// Single-installation API (`server_v1_mono`).
    #[default]
    Mono,
    /// Multi-installation API (`server_v1_multi`).
    Multi,
}

impl ApiFolder {
    /// Path segment below the server root, without surrounding slashes.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            ApiFolder::Mono => "server_v1_mono/api",
            ApiFolder::Multi => "server_v1_multi/api",
        }
    }
}

/// Request field that carries device ids in a device-detail sync.
///
/// The vendor accepts both `IDs` and `ECOs` and it is not documented which
/// one applies to ventilation units, so the choice is explicit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceIdField {
    /// Ids go into `IDs`, `ECOs` is empty.
    Ids,
    /// Ids go into `ECOs`, `IDs` is empty.
    #[default]
    Ecos,
}

/// Settings for [`crate::CloudClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Server root, e.g. `https://intelliclima.fantinicosmi.it`.
    pub base_url: String,
    pub api_folder: ApiFolder,
    pub device_id_field: DeviceIdField,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_folder: ApiFolder::default(),
            device_id_field: DeviceIdField::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Config pointing at another server, e.g. a local test double.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn api_folder(mut self, folder: ApiFolder) -> Self {
        self.api_folder = folder;
        self
    }

    #[must_use]
    pub fn device_id_field(mut self, field: DeviceIdField) -> Self {
        self.device_id_field = field;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the URL scheme and timeout, and strip trailing slashes.
    pub fn validated(mut self) -> Result<Self> {
        self.base_url = self.base_url.trim_end_matches('/').to_string();

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::InvalidConfig(format!(
                "URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }

    /// Full URL of an endpoint below the API folder.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_folder.path(),
            path.trim_start_matches('/')
        )
    }
}
