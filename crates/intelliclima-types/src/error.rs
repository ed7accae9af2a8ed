//! Error types for command framing in intelliclima-types.

use thiserror::Error;

/// Errors that can occur when building or parsing a command frame.
///
/// This error type is transport-agnostic; HTTP and relay failures
/// belong in intelliclima-core.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FrameError {
    /// Checksum input was not an even-length hexadecimal string.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Device serial is not exactly 8 hexadecimal characters.
    #[error("Invalid serial '{0}': expected exactly 8 hexadecimal characters")]
    InvalidSerial(String),

    /// Speed code is not one of the firmware-defined levels.
    #[error("Invalid speed {0}: valid codes are 0, 1, 2, 3, 4 and 16")]
    InvalidSpeed(i64),

    /// Speed text is neither a level name nor a numeric code.
    #[error("Unknown speed '{0}': expected off, sleep, speed1, speed2, speed3, auto or a code")]
    UnknownSpeedName(String),

    /// Frame text has the wrong number of characters.
    #[error("Invalid frame length: expected {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Start or end byte is not the expected delimiter.
    #[error("Invalid {field} byte: expected {expected}, got {actual}")]
    InvalidDelimiter {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },

    /// A constant header field does not carry the expected value.
    #[error("Unexpected {field}: expected {expected}, got {actual}")]
    UnexpectedField {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },

    /// Checksum byte does not match the CRC of the frame body.
    #[error("Checksum mismatch: frame carries {actual:02X}, computed {expected:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

/// Result type alias using intelliclima-types' FrameError type.
pub type FrameResult<T> = std::result::Result<T, FrameError>;
