//! Request and response bodies of the IntelliClima cloud API.
//!
//! The vendor is loose with JSON types: ids arrive as numbers or strings,
//! flags as booleans or 0/1. The deserializers here accept either form.

use std::collections::BTreeMap;

use intelliclima_types::{Device, House};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Vendor status value for a successful call.
pub const STATUS_OK: &str = "OK";

/// Id of the pseudo-entry that carries a house's name in a house listing.
pub const HOUSE_NAME_ENTRY_ID: i64 = -1;

/// Body of `user/login/{login}/{password_hash}`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub manufacturer: String,
    pub model: String,
    pub platform: String,
    pub version: String,
    pub serial: String,
    pub uuid: String,
    pub language: String,
}

impl LoginRequest {
    /// Login body identifying this client, with a fresh uppercase UUID.
    pub fn for_this_client() -> Self {
        Self {
            manufacturer: "intelliclima-rs".to_string(),
            model: "Rust".to_string(),
            platform: "IntelliClimaCli".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            serial: "unknown".to_string(),
            uuid: uuid::Uuid::new_v4().to_string().to_uppercase(),
            language: "english".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "opt_text_or_number")]
    pub id: Option<String>,
}

/// Response of `casa/elenco2/{token_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct HousesResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub houses: BTreeMap<String, Vec<HouseEntry>>,
}

/// One entry of a house listing: a device, or the house name pseudo-entry.
#[derive(Debug, Clone, Deserialize)]
pub struct HouseEntry {
    #[serde(deserialize_with = "int_or_string")]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "isMaster", default, deserialize_with = "flexible_bool")]
    pub is_master: bool,
    #[serde(default, deserialize_with = "text_or_number")]
    pub tipo: String,
}

impl HousesResponse {
    /// Convert the listing into houses with devices that have no serial yet.
    pub fn into_houses(self) -> Result<Vec<House>, String> {
        let mut houses = Vec::with_capacity(self.houses.len());
        for (key, entries) in self.houses {
            let house_id: i64 = key
                .trim()
                .parse()
                .map_err(|_| format!("house id is not a number: {key}"))?;
            let name = entries
                .iter()
                .find(|entry| entry.id == HOUSE_NAME_ENTRY_ID)
                .and_then(|entry| entry.name.clone())
                .unwrap_or_else(|| "Unknown".to_string());
            let devices = entries
                .into_iter()
                .filter(|entry| entry.id != HOUSE_NAME_ENTRY_ID)
                .map(|entry| Device::new(entry.id, entry.is_master, entry.tipo, house_id))
                .collect();
            houses.push(House::new(house_id, name, devices));
        }
        Ok(houses)
    }
}

/// Body of `sync/cronos380`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSyncRequest {
    #[serde(rename = "IDs")]
    pub ids: String,
    #[serde(rename = "ECOs")]
    pub ecos: String,
    pub includi_eco: bool,
    pub includi_ledot: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSyncResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Vec<DeviceDetails>,
}

/// Detail record of one device, as returned by a device sync.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceDetails {
    #[serde(deserialize_with = "int_or_string")]
    pub id: i64,
    #[serde(default, deserialize_with = "opt_text_or_number")]
    pub crono_sn: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl DeviceDetails {
    /// Serial in canonical uppercase form, if the vendor sent one.
    pub fn serial(&self) -> Option<String> {
        self.crono_sn
            .as_deref()
            .map(str::trim)
            .filter(|sn| !sn.is_empty())
            .map(str::to_uppercase)
    }
}

/// Body of `eco/send/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TramaRequest {
    pub trama: String,
}

fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("id out of range: {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("id is not a number: {s}"))),
        other => Err(D::Error::custom(format!("unexpected id: {other}"))),
    }
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true"),
        _ => false,
    })
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_text_or_number(deserializer)?.unwrap_or_default())
}

fn opt_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    })
}
