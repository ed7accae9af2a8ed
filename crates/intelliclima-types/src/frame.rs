//! Speed command frames ("trama") and their CRC-8 checksum.
//!
//! A frame is 16 bytes, carried as 32 uppercase hex characters:
//!
//! | Field | Hex chars | Value |
//! |-------|-----------|-------|
//! | start | 2 | `0A` |
//! | serial | 8 | device serial |
//! | command type | 4 | `000E` |
//! | function code | 4 | `2F00` |
//! | payload prefix | 8 | `50000004` |
//! | speed | 2 | [`Speed`] code |
//! | checksum | 2 | CRC-8 over serial..speed |
//! | end | 2 | `0D` |
//!
//! # Example
//!
//! ```
//! use intelliclima_types::frame::encode_speed_frame;
//!
//! let frame = encode_speed_frame("31377ABC", 2).unwrap();
//! assert_eq!(frame.as_str(), "0A31377ABC000E2F005000000402E70D");
//! ```

use core::fmt;

use crate::error::{FrameError, FrameResult};
use crate::types::{DeviceSerial, Speed};

/// Frame start delimiter.
pub const START_BYTE: u8 = 0x0A;
/// Frame end delimiter.
pub const END_BYTE: u8 = 0x0D;
/// Command type field.
pub const COMMAND_TYPE: [u8; 2] = [0x00, 0x0E];
/// Function code field.
pub const FUNCTION_CODE: [u8; 2] = [0x2F, 0x00];
/// Fixed payload bytes preceding the speed byte.
pub const PAYLOAD_PREFIX: [u8; 4] = [0x50, 0x00, 0x00, 0x04];

/// CRC-8 generator polynomial.
pub const CRC8_POLY: u8 = 0x31;
/// CRC-8 accumulator seed.
pub const CRC8_INIT: u8 = 0xFF;

/// Frame length in bytes.
pub const FRAME_LEN: usize = 16;
/// Frame length in hex characters.
pub const FRAME_HEX_LEN: usize = FRAME_LEN * 2;

// Byte offsets inside the frame.
const SERIAL_AT: usize = 1;
const COMMAND_AT: usize = 5;
const FUNCTION_AT: usize = 7;
const PAYLOAD_AT: usize = 9;
const SPEED_AT: usize = 13;
const CRC_AT: usize = 14;
const END_AT: usize = 15;

/// CRC-8 with polynomial 0x31, seed 0xFF, MSB first, no reflection, no final XOR.
///
/// ```
/// use intelliclima_types::frame::crc8;
///
/// assert_eq!(crc8(&[0x00]), 0xAC);
/// assert_eq!(crc8(b"123456789"), 0xF7);
/// ```
#[must_use]
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = CRC8_INIT;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLY
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// CRC-8 of a hex string, returned as 2 uppercase hex characters.
///
/// The input is read two characters per byte and is case-insensitive.
/// Odd-length or non-hex input fails with [`FrameError::MalformedInput`].
pub fn crc8_hex(buffer: &str) -> FrameResult<String> {
    if buffer.len() % 2 != 0 {
        return Err(FrameError::MalformedInput(format!(
            "odd number of hex characters ({})",
            buffer.len()
        )));
    }
    let bytes =
        hex::decode(buffer).map_err(|e| FrameError::MalformedInput(format!("{buffer}: {e}")))?;
    Ok(format!("{:02X}", crc8(&bytes)))
}

/// An encoded speed command, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    hex: String,
}

impl Frame {
    /// Build the frame commanding `serial` to run at `speed`.
    #[must_use]
    pub fn speed(serial: &DeviceSerial, speed: Speed) -> Self {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = START_BYTE;
        bytes[SERIAL_AT..COMMAND_AT].copy_from_slice(&serial.to_bytes());
        bytes[COMMAND_AT..FUNCTION_AT].copy_from_slice(&COMMAND_TYPE);
        bytes[FUNCTION_AT..PAYLOAD_AT].copy_from_slice(&FUNCTION_CODE);
        bytes[PAYLOAD_AT..SPEED_AT].copy_from_slice(&PAYLOAD_PREFIX);
        bytes[SPEED_AT] = speed.code();
        bytes[CRC_AT] = crc8(&bytes[SERIAL_AT..CRC_AT]);
        bytes[END_AT] = END_BYTE;

        Self {
            hex: hex::encode_upper(bytes),
        }
    }

    /// The frame as 32 uppercase hex characters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// The checksum byte carried by this frame.
    #[must_use]
    pub fn checksum(&self) -> &str {
        &self.hex[CRC_AT * 2..END_AT * 2]
    }

    /// Parse and verify a frame produced by [`Frame::speed`].
    ///
    /// Input is case-insensitive. Every constant field and the checksum are
    /// checked before the serial and speed are returned.
    pub fn parse(text: &str) -> FrameResult<SpeedCommand> {
        if text.len() != FRAME_HEX_LEN {
            return Err(FrameError::InvalidLength {
                expected: FRAME_HEX_LEN,
                actual: text.len(),
            });
        }
        let mut bytes = [0u8; FRAME_LEN];
        hex::decode_to_slice(text, &mut bytes)
            .map_err(|e| FrameError::MalformedInput(format!("{text}: {e}")))?;

        if bytes[0] != START_BYTE {
            return Err(FrameError::InvalidDelimiter {
                field: "start",
                expected: "0A",
                actual: format!("{:02X}", bytes[0]),
            });
        }
        if bytes[END_AT] != END_BYTE {
            return Err(FrameError::InvalidDelimiter {
                field: "end",
                expected: "0D",
                actual: format!("{:02X}", bytes[END_AT]),
            });
        }
        check_field(&bytes[COMMAND_AT..FUNCTION_AT], &COMMAND_TYPE, "command type", "000E")?;
        check_field(&bytes[FUNCTION_AT..PAYLOAD_AT], &FUNCTION_CODE, "function code", "2F00")?;
        check_field(&bytes[PAYLOAD_AT..SPEED_AT], &PAYLOAD_PREFIX, "payload prefix", "50000004")?;

        let expected = crc8(&bytes[SERIAL_AT..CRC_AT]);
        if bytes[CRC_AT] != expected {
            return Err(FrameError::ChecksumMismatch {
                expected,
                actual: bytes[CRC_AT],
            });
        }

        let serial = hex::encode_upper(&bytes[SERIAL_AT..COMMAND_AT]).parse()?;
        let speed = Speed::try_from(bytes[SPEED_AT])?;
        Ok(SpeedCommand { serial, speed })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl AsRef<str> for Frame {
    fn as_ref(&self) -> &str {
        &self.hex
    }
}

fn check_field(
    got: &[u8],
    want: &[u8],
    field: &'static str,
    expected: &'static str,
) -> FrameResult<()> {
    if got == want {
        Ok(())
    } else {
        Err(FrameError::UnexpectedField {
            field,
            expected,
            actual: hex::encode_upper(got),
        })
    }
}

/// Serial and speed recovered from a parsed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedCommand {
    pub serial: DeviceSerial,
    pub speed: Speed,
}

/// Validate raw inputs and build a speed frame.
///
/// Fails with [`FrameError::InvalidSerial`] unless `serial` is exactly 8 hex
/// characters, and with [`FrameError::InvalidSpeed`] unless `speed` is one of
/// the firmware codes.
pub fn encode_speed_frame(serial: &str, speed: u8) -> FrameResult<Frame> {
    let serial: DeviceSerial = serial.parse()?;
    let speed = Speed::try_from(speed)?;
    Ok(Frame::speed(&serial, speed))
}
