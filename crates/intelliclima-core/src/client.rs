//! HTTP client for the IntelliClima cloud.
//!
//! # Example
//!
//! ```no_run
//! use intelliclima_core::{ApiConfig, CloudClient, Credentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CloudClient::new(ApiConfig::default())?;
//! let session = client.login(&Credentials::new("me@example.com", "secret")).await?;
//!
//! let houses = client.houses(&session).await?;
//! println!("{} houses", houses.len());
//! # Ok(())
//! # }
//! ```

use core::fmt;

use async_trait::async_trait;
use intelliclima_types::{Frame, House, Session};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::api::{
    DeviceDetails, DeviceSyncRequest, DeviceSyncResponse, HousesResponse, LoginRequest,
    LoginResponse, STATUS_OK, TramaRequest,
};
use crate::config::{ApiConfig, DeviceIdField};
use crate::error::{Error, Result};
use crate::traits::{Relay, RelayResponse};

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "Token";
/// Header carrying the session token id.
pub const TOKEN_ID_HEADER: &str = "Tokenid";

/// Longest response excerpt kept in error messages.
const MAX_ERROR_BODY: usize = 200;

/// Account login and password.
#[derive(Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Read `LOGIN` and `PASSWORD` from the process environment.
    pub fn from_env() -> Result<Self> {
        let login = std::env::var("LOGIN")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::MissingCredentials("LOGIN is not set".to_string()))?;
        let password = std::env::var("PASSWORD")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::MissingCredentials("PASSWORD is not set".to_string()))?;
        Ok(Self::new(login, password))
    }

    /// Lowercase hex SHA-256 of the password, as the login endpoint expects.
    #[must_use]
    pub fn password_hash(&self) -> String {
        hex::encode(Sha256::digest(self.password.as_bytes()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Client for the vendor cloud.
#[derive(Debug, Clone)]
pub struct CloudClient {
    client: Client,
    config: ApiConfig,
}

impl CloudClient {
    /// Create a client. The configured timeout applies to every request.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let config = config.validated()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(config: ApiConfig, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Log in and return a fresh session.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let url = self.config.endpoint(&format!(
            "user/login/{}/{}",
            credentials.login,
            credentials.password_hash()
        ));
        let body = LoginRequest::for_this_client();
        let response: LoginResponse = self.post(&url, None, Some(&body)).await?;
        ensure_ok(&response.status, "login")?;

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::InvalidResponse("login response has no token".to_string()))?;
        let token_id = response
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::InvalidResponse("login response has no id".to_string()))?;

        info!("Login successful for {}", credentials.login);
        Ok(Session::new(token, token_id, OffsetDateTime::now_utc()))
    }

    /// List the houses of the account and their devices.
    ///
    /// Devices come back without serial or name; see [`CloudClient::device_details`].
    pub async fn houses(&self, session: &Session) -> Result<Vec<House>> {
        let url = self
            .config
            .endpoint(&format!("casa/elenco2/{}", session.token_id));
        let response: HousesResponse = self.post(&url, Some(session), None::<&()>).await?;
        ensure_ok(&response.status, "house listing")?;

        let houses = response.into_houses().map_err(Error::InvalidResponse)?;
        info!("Found {} houses", houses.len());
        Ok(houses)
    }

    /// Fetch detail records (serial, name) for the given device ids.
    pub async fn device_details(
        &self,
        session: &Session,
        device_ids: &[i64],
    ) -> Result<Vec<DeviceDetails>> {
        if device_ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.config.endpoint("sync/cronos380");
        let body = self.sync_request(device_ids);
        let response: DeviceSyncResponse = self.post(&url, Some(session), Some(&body)).await?;
        ensure_ok(&response.status, "device sync")?;

        debug!("Device sync returned {} records", response.data.len());
        Ok(response.data)
    }

    /// Send a frame to the relay.
    pub async fn send_trama(&self, session: &Session, frame: &Frame) -> Result<RelayResponse> {
        let url = self.config.endpoint("eco/send/");
        let body = TramaRequest {
            trama: frame.to_string(),
        };
        debug!("Sending trama {} to {}", frame, url);

        let response = self
            .authorize(self.client.post(&url), Some(session))
            .json(&body)
            .send()
            .await
            .map_err(|source| Error::Http {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        let text = response.text().await.map_err(|source| Error::Http {
            url: url.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: excerpt(&text, status.as_str()),
            });
        }

        debug!("Relay answered {}: {}", status.as_u16(), text);
        Ok(RelayResponse {
            status: status.as_u16(),
            body: text,
        })
    }

    fn sync_request(&self, device_ids: &[i64]) -> DeviceSyncRequest {
        let joined = device_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let (ids, ecos) = match self.config.device_id_field {
            DeviceIdField::Ids => (joined, String::new()),
            DeviceIdField::Ecos => (String::new(), joined),
        };
        DeviceSyncRequest {
            ids,
            ecos,
            includi_eco: true,
            includi_ledot: true,
        }
    }

    fn authorize(&self, request: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        match session {
            Some(session) => request
                .header(TOKEN_HEADER, &session.token)
                .header(TOKEN_ID_HEADER, &session.token_id),
            None => request,
        }
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        session: Option<&Session>,
        body: Option<&B>,
    ) -> Result<T> {
        debug!("POST {}", redact_login_url(url));
        let mut request = self.authorize(self.client.post(url), session);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| Error::Http {
            url: redact_login_url(url),
            source,
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|source| Error::Http {
            url: redact_login_url(url),
            source,
        })?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: excerpt(&text, status.as_str()),
            });
        }
        serde_json::from_str(&text).map_err(|e| {
            Error::InvalidResponse(format!("{}: {e}: {}", redact_login_url(url), excerpt(&text, "")))
        })
    }
}

#[async_trait]
impl Relay for CloudClient {
    async fn send_frame(&self, session: &Session, frame: &Frame) -> Result<RelayResponse> {
        self.send_trama(session, frame).await
    }
}

/// Fill serial and name of the devices that have a matching detail record.
///
/// Returns the number of devices updated. Values missing from a record do
/// not overwrite what the device already has.
pub fn apply_details(houses: &mut [House], details: &[DeviceDetails]) -> usize {
    let mut updated = 0;
    for device in houses.iter_mut().flat_map(|house| house.devices.iter_mut()) {
        let Some(detail) = details.iter().find(|d| d.id == device.id) else {
            continue;
        };
        if let Some(serial) = detail.serial() {
            device.serial = Some(serial);
        }
        if let Some(name) = detail.name.as_deref().filter(|n| !n.is_empty()) {
            device.name = Some(name.to_string());
        }
        updated += 1;
    }
    updated
}

fn ensure_ok(status: &str, operation: &str) -> Result<()> {
    if status == STATUS_OK {
        Ok(())
    } else {
        Err(Error::Api {
            status: 200,
            message: format!("{operation} refused with status {status:?}"),
        })
    }
}

fn excerpt(text: &str, fallback: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return fallback.to_string();
    }
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Hide the password hash that the login endpoint carries in its path.
fn redact_login_url(url: &str) -> String {
    match url.find("/user/login/") {
        Some(at) => format!("{}/user/login/<redacted>", &url[..at]),
        None => url.to_string(),
    }
}
