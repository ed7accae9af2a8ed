//! Core types for IntelliClima accounts and devices.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};
use time::{Duration, OffsetDateTime};

use crate::error::FrameError;

/// How long a session credential stays valid after login.
pub const SESSION_LIFETIME: Duration = Duration::hours(24);

/// Number of hexadecimal characters in a device serial.
pub const SERIAL_LEN: usize = 8;

/// Ventilation speed level understood by the unit firmware.
///
/// The discriminants are the raw command codes carried in the speed byte
/// of a frame. They are fixed by the firmware and not contiguous.
///
/// # Examples
///
/// ```
/// use intelliclima_types::Speed;
///
/// assert_eq!(Speed::Speed1.code(), 2);
/// assert_eq!(Speed::try_from(16), Ok(Speed::Auto));
/// assert!(Speed::try_from(5).is_err());
/// assert_eq!("auto".parse::<Speed>(), Ok(Speed::Auto));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Speed {
    /// Unit stopped.
    Off = 0,
    /// Night mode.
    Sleep = 1,
    /// First fixed speed.
    Speed1 = 2,
    /// Second fixed speed.
    Speed2 = 3,
    /// Third fixed speed.
    Speed3 = 4,
    /// Unit regulates itself.
    Auto = 16,
}

impl Speed {
    /// All levels, in firmware code order.
    pub const ALL: [Speed; 6] = [
        Speed::Off,
        Speed::Sleep,
        Speed::Speed1,
        Speed::Speed2,
        Speed::Speed3,
        Speed::Auto,
    ];

    /// Raw command code sent in the speed byte.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Short lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Speed::Off => "off",
            Speed::Sleep => "sleep",
            Speed::Speed1 => "speed1",
            Speed::Speed2 => "speed2",
            Speed::Speed3 => "speed3",
            Speed::Auto => "auto",
        }
    }

    /// Validate a wide integer code, as received from user input.
    pub fn from_code(code: i64) -> Result<Self, FrameError> {
        u8::try_from(code)
            .map_err(|_| FrameError::InvalidSpeed(code))
            .and_then(Speed::try_from)
    }
}

impl TryFrom<u8> for Speed {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Speed::Off),
            1 => Ok(Speed::Sleep),
            2 => Ok(Speed::Speed1),
            3 => Ok(Speed::Speed2),
            4 => Ok(Speed::Speed3),
            16 => Ok(Speed::Auto),
            other => Err(FrameError::InvalidSpeed(i64::from(other))),
        }
    }
}

impl FromStr for Speed {
    type Err = FrameError;

    /// Parse a level name: `off`, `sleep`, `1`/`speed1`, `2`/`speed2`,
    /// `3`/`speed3` or `auto`. A raw firmware code needs the `code:` prefix,
    /// so `"1"` is [`Speed::Speed1`] and `"code:1"` is [`Speed::Sleep`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(code) = lower.strip_prefix("code:") {
            return match code.trim().parse::<i64>() {
                Ok(code) => Speed::from_code(code),
                Err(_) => Err(FrameError::UnknownSpeedName(s.to_string())),
            };
        }
        match lower.as_str() {
            "1" => return Ok(Speed::Speed1),
            "2" => return Ok(Speed::Speed2),
            "3" => return Ok(Speed::Speed3),
            _ => {}
        }
        Speed::ALL
            .iter()
            .find(|speed| speed.name() == lower)
            .copied()
            .ok_or_else(|| FrameError::UnknownSpeedName(s.to_string()))
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speed::Off => write!(f, "Off"),
            Speed::Sleep => write!(f, "Sleep"),
            Speed::Speed1 => write!(f, "Speed 1"),
            Speed::Speed2 => write!(f, "Speed 2"),
            Speed::Speed3 => write!(f, "Speed 3"),
            Speed::Auto => write!(f, "Auto"),
        }
    }
}

/// Validated 8-character hexadecimal device serial, stored uppercase.
///
/// ```
/// use intelliclima_types::DeviceSerial;
///
/// let serial: DeviceSerial = "31377abc".parse().unwrap();
/// assert_eq!(serial.as_str(), "31377ABC");
/// assert!("31377AB".parse::<DeviceSerial>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct DeviceSerial(String);

impl DeviceSerial {
    /// The serial as uppercase hex text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The serial as 4 raw bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 4] {
        let mut out = [0u8; 4];
        // Validated on construction.
        hex::decode_to_slice(&self.0, &mut out).unwrap_or_default();
        out
    }
}

impl FromStr for DeviceSerial {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != SERIAL_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FrameError::InvalidSerial(s.to_string()));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for DeviceSerial {
    type Error = FrameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceSerial> for String {
    fn from(serial: DeviceSerial) -> Self {
        serial.0
    }
}

impl fmt::Display for DeviceSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ventilation unit registered to an account.
///
/// `serial` and `name` are unknown after house discovery and are filled in
/// by a device-detail sync.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Device {
    pub id: i64,
    pub is_master: bool,
    /// Vendor device type (`tipo`), kept as text.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub device_type: String,
    pub house_id: i64,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "empty_as_none")
    )]
    pub serial: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "empty_as_none")
    )]
    pub name: Option<String>,
}

impl Device {
    /// Create a device as returned by house discovery, without serial or name.
    pub fn new(id: i64, is_master: bool, device_type: impl Into<String>, house_id: i64) -> Self {
        Self {
            id,
            is_master,
            device_type: device_type.into(),
            house_id,
            serial: None,
            name: None,
        }
    }

    /// Builder-style serial setter.
    #[must_use]
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    /// Builder-style name setter.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name for display, falling back to the numeric id.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("device {}", self.id),
        }
    }
}

/// A house (installation) and the devices it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct House {
    pub id: i64,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub devices: Vec<Device>,
}

impl House {
    pub fn new(id: i64, name: impl Into<String>, devices: Vec<Device>) -> Self {
        Self {
            id,
            name: name.into(),
            devices,
        }
    }
}

#[cfg(feature = "serde")]
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Session credential returned by login.
///
/// The token pair is sent as request headers on every authenticated call.
/// `Debug` does not print the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub token_id: String,
    pub acquired_at: OffsetDateTime,
}

impl Session {
    pub fn new(
        token: impl Into<String>,
        token_id: impl Into<String>,
        acquired_at: OffsetDateTime,
    ) -> Self {
        Self {
            token: token.into(),
            token_id: token_id.into(),
            acquired_at,
        }
    }

    /// Instant after which the vendor no longer accepts the token.
    #[must_use]
    pub fn expires_at(&self) -> OffsetDateTime {
        self.acquired_at + SESSION_LIFETIME
    }

    /// Whether the session is expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at()
    }

    /// Whether the session is expired right now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("token_id", &self.token_id)
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}
