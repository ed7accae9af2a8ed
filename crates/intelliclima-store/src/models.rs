//! On-disk record types.

use intelliclima_types::Session;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Duration, OffsetDateTime};

use crate::error::{Error, Result};

/// Contents of `tokens.json`.
///
/// `timestamp` is the login instant in fractional UNIX seconds. `token_id`
/// is written as text but read back from either a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub auth_token: String,
    #[serde(deserialize_with = "text_or_number")]
    pub token_id: String,
    pub timestamp: f64,
}

impl StoredTokens {
    pub fn from_session(session: &Session) -> Self {
        Self {
            auth_token: session.token.clone(),
            token_id: session.token_id.clone(),
            timestamp: session.acquired_at.unix_timestamp() as f64
                + f64::from(session.acquired_at.nanosecond()) / 1e9,
        }
    }

    pub fn to_session(&self) -> Result<Session> {
        if !self.timestamp.is_finite() {
            return Err(Error::InvalidTimestamp(self.timestamp.to_string()));
        }
        let secs = self.timestamp.floor();
        let nanos = ((self.timestamp - secs) * 1e9).round() as i64;
        let acquired_at = OffsetDateTime::from_unix_timestamp(secs as i64)
            .map_err(|e| Error::InvalidTimestamp(format!("{}: {e}", self.timestamp)))?
            + Duration::nanoseconds(nanos);
        Ok(Session::new(
            self.auth_token.clone(),
            self.token_id.clone(),
            acquired_at,
        ))
    }
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number token id, got {other}"
        ))),
    }
}
