//! Platform-agnostic types for IntelliClima ventilation units.
//!
//! This crate provides the types shared by the cloud client
//! (intelliclima-core), the local store (intelliclima-store) and the CLI.
//! It performs no I/O.
//!
//! # Features
//!
//! - Speed levels and validated device serials
//! - Device and house records, with optional serial and name
//! - Session credential with a 24 hour lifetime
//! - Speed command frames and their CRC-8 checksum
//!
//! # Example
//!
//! ```
//! use intelliclima_types::{DeviceSerial, Frame, Speed};
//!
//! let serial: DeviceSerial = "31377ABC".parse().unwrap();
//! let frame = Frame::speed(&serial, Speed::Speed1);
//! assert_eq!(frame.as_str(), "0A31377ABC000E2F005000000402E70D");
//! ```

pub mod error;
pub mod frame;
pub mod types;

pub use error::{FrameError, FrameResult};
pub use frame::{Frame, SpeedCommand, crc8, crc8_hex, encode_speed_frame};
pub use types::{Device, DeviceSerial, House, SERIAL_LEN, SESSION_LIFETIME, Session, Speed};

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Duration, OffsetDateTime};

    // --- Speed tests ---

    #[test]
    fn test_speed_codes() {
        assert_eq!(Speed::Off as u8, 0);
        assert_eq!(Speed::Sleep as u8, 1);
        assert_eq!(Speed::Speed1 as u8, 2);
        assert_eq!(Speed::Speed2 as u8, 3);
        assert_eq!(Speed::Speed3 as u8, 4);
        assert_eq!(Speed::Auto as u8, 16);
    }

    #[test]
    fn test_speed_try_from_valid_codes() {
        for speed in Speed::ALL {
            assert_eq!(Speed::try_from(speed.code()), Ok(speed));
        }
    }

    #[test]
    fn test_speed_try_from_invalid_codes() {
        for code in [5u8, 8, 15, 17, 32, 255] {
            assert_eq!(
                Speed::try_from(code),
                Err(FrameError::InvalidSpeed(i64::from(code)))
            );
        }
    }

    #[test]
    fn test_speed_from_wide_code() {
        assert_eq!(Speed::from_code(16), Ok(Speed::Auto));
        assert_eq!(Speed::from_code(-1), Err(FrameError::InvalidSpeed(-1)));
        assert_eq!(Speed::from_code(256), Err(FrameError::InvalidSpeed(256)));
        assert_eq!(Speed::from_code(258), Err(FrameError::InvalidSpeed(258)));
    }

    #[test]
    fn test_speed_from_str() {
        assert_eq!("off".parse::<Speed>(), Ok(Speed::Off));
        assert_eq!("SLEEP".parse::<Speed>(), Ok(Speed::Sleep));
        assert_eq!("speed2".parse::<Speed>(), Ok(Speed::Speed2));
        assert_eq!(" auto ".parse::<Speed>(), Ok(Speed::Auto));
        // Bare digits are level names, not firmware codes
        assert_eq!("1".parse::<Speed>(), Ok(Speed::Speed1));
        assert_eq!("2".parse::<Speed>(), Ok(Speed::Speed2));
        assert_eq!("3".parse::<Speed>(), Ok(Speed::Speed3));
        assert!(matches!(
            "4".parse::<Speed>(),
            Err(FrameError::UnknownSpeedName(_))
        ));
    }

    #[test]
    fn test_speed_from_explicit_code() {
        assert_eq!("code:1".parse::<Speed>(), Ok(Speed::Sleep));
        assert_eq!("CODE:16".parse::<Speed>(), Ok(Speed::Auto));
        assert_eq!("code:7".parse::<Speed>(), Err(FrameError::InvalidSpeed(7)));
        assert!(matches!(
            "code:fast".parse::<Speed>(),
            Err(FrameError::UnknownSpeedName(_))
        ));
        assert!(matches!(
            "turbo".parse::<Speed>(),
            Err(FrameError::UnknownSpeedName(_))
        ));
    }

    #[test]
    fn test_speed_display() {
        assert_eq!(Speed::Off.to_string(), "Off");
        assert_eq!(Speed::Speed1.to_string(), "Speed 1");
        assert_eq!(Speed::Auto.to_string(), "Auto");
    }

    #[test]
    fn test_speed_serialization() {
        assert_eq!(serde_json::to_string(&Speed::Speed3).unwrap(), "\"speed3\"");
        let speed: Speed = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(speed, Speed::Auto);
    }

    // --- DeviceSerial tests ---

    #[test]
    fn test_serial_is_uppercased() {
        let serial: DeviceSerial = "0a1b2c3d".parse().unwrap();
        assert_eq!(serial.as_str(), "0A1B2C3D");
        assert_eq!(serial.to_string(), "0A1B2C3D");
        assert_eq!(serial.to_bytes(), [0x0A, 0x1B, 0x2C, 0x3D]);
    }

    #[test]
    fn test_serial_rejects_wrong_length() {
        for input in ["", "1234567", "123456789", "31377"] {
            assert_eq!(
                input.parse::<DeviceSerial>(),
                Err(FrameError::InvalidSerial(input.to_string()))
            );
        }
    }

    #[test]
    fn test_serial_rejects_non_hex() {
        assert!("3137-ABC".parse::<DeviceSerial>().is_err());
        assert!("GGGGGGGG".parse::<DeviceSerial>().is_err());
    }

    #[test]
    fn test_serial_deserialization_validates() {
        let serial: DeviceSerial = serde_json::from_str("\"31377abc\"").unwrap();
        assert_eq!(serial.as_str(), "31377ABC");
        assert!(serde_json::from_str::<DeviceSerial>("\"31377\"").is_err());
    }

    // --- Device / House tests ---

    #[test]
    fn test_device_starts_without_serial_or_name() {
        let device = Device::new(42, true, "ECO", 7);
        assert!(device.serial.is_none());
        assert!(device.name.is_none());
        assert_eq!(device.label(), "device 42");
    }

    #[test]
    fn test_device_builders() {
        let device = Device::new(42, false, "ECO", 7)
            .with_serial("31377ABC")
            .with_name("Bedroom");
        assert_eq!(device.serial.as_deref(), Some("31377ABC"));
        assert_eq!(device.label(), "Bedroom");
    }

    #[test]
    fn test_device_serializes_type_field() {
        let device = Device::new(1, true, "ECO", 2).with_serial("31377ABC");
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["type"], "ECO");
        assert_eq!(json["serial"], "31377ABC");
        assert!(json["name"].is_null());
    }

    #[test]
    fn test_device_missing_optional_fields() {
        let json = r#"{"id":1,"is_master":true,"type":"ECO","house_id":2}"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert!(device.serial.is_none());
        assert!(device.name.is_none());
    }

    #[test]
    fn test_device_empty_strings_are_absent() {
        let json = r#"{"id":1,"is_master":false,"type":"ECO","house_id":2,"serial":"","name":""}"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert!(device.serial.is_none());
        assert!(device.name.is_none());
    }

    #[test]
    fn test_house_roundtrip() {
        let house = House::new(
            12,
            "Home",
            vec![Device::new(1, true, "ECO", 12).with_serial("31377ABC")],
        );
        let json = serde_json::to_string(&house).unwrap();
        let back: House = serde_json::from_str(&json).unwrap();
        assert_eq!(back, house);
    }

    // --- Session tests ---

    #[test]
    fn test_session_expiry() {
        let acquired = OffsetDateTime::UNIX_EPOCH;
        let session = Session::new("tok", "77", acquired);

        assert_eq!(session.expires_at(), acquired + Duration::hours(24));
        assert!(!session.is_expired_at(acquired + Duration::hours(23)));
        assert!(session.is_expired_at(acquired + Duration::hours(24)));
        assert!(session.is_expired_at(acquired + Duration::days(3)));
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::new("super-secret", "77", OffsetDateTime::UNIX_EPOCH);
        let debug = format!("{:?}", session);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("77"));
    }

    // --- FrameError tests ---

    #[test]
    fn test_frame_error_display() {
        let err = FrameError::InvalidSerial("123".to_string());
        assert!(err.to_string().contains("123"));
        let err = FrameError::ChecksumMismatch {
            expected: 0xE7,
            actual: 0x00,
        };
        assert_eq!(
            err.to_string(),
            "Checksum mismatch: frame carries 00, computed E7"
        );
    }
}
