//! Error types for intelliclima-core.
//!
//! This module defines the errors that can occur when talking to the
//! IntelliClima cloud and when dispatching commands to devices.
//!
//! # Error Recovery Strategies
//!
//! | Error Type | Strategy | Rationale |
//! |------------|----------|-----------|
//! | [`Error::Frame`] | Do not retry | Caller passed a bad serial or speed |
//! | [`Error::DispatchFailure`] | Report, optionally retry | Relay or network trouble for one device |
//! | [`Error::Http`] | Retry | Network errors are often transient |
//! | [`Error::Api`] | Retry on 5xx only | 4xx and vendor refusals need a fix |
//! | [`Error::InvalidResponse`] | Do not retry | Vendor changed the response format |
//! | [`Error::InvalidConfig`] | Do not retry | Fix configuration and restart |
//! | [`Error::MissingCredentials`] | Do not retry | Set `LOGIN` and `PASSWORD` |
//!
//! ## Batch isolation
//!
//! [`crate::Dispatcher::send_batch`] never returns an error. Each device gets
//! its own [`crate::DeviceOutcome`], so one failing unit does not stop the
//! others from being commanded.

use intelliclima_types::FrameError;
use thiserror::Error;

/// Errors that can occur when talking to the IntelliClima cloud.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A frame could not be built from the given serial and speed.
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// The relay did not accept a command for a device.
    #[error("Dispatch to {serial} failed: {reason}")]
    DispatchFailure {
        /// Serial of the device the command was for.
        serial: String,
        /// Description of the underlying transport failure.
        reason: String,
    },

    /// The HTTP request could not be completed.
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with an error status or refused the request.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The server answered with a body that could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Login or password was not provided.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

impl Error {
    /// Whether the operation may succeed if attempted again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http { .. } => true,
            Error::DispatchFailure { .. } => true,
            Error::Api { status, .. } => *status >= 500,
            Error::Frame(_) => false,
            Error::InvalidResponse(_) => false,
            Error::InvalidConfig(_) => false,
            Error::MissingCredentials(_) => false,
        }
    }
}

/// Result type alias using intelliclima-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DispatchFailure {
            serial: "31377ABC".to_string(),
            reason: "API error (503): busy".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Dispatch to 31377ABC failed: API error (503): busy"
        );

        let err = Error::Api {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error (401): unauthorized");
    }

    #[test]
    fn test_frame_error_converts() {
        let err: Error = FrameError::InvalidSpeed(9).into();
        assert!(matches!(err, Error::Frame(FrameError::InvalidSpeed(9))));
        assert!(err.to_string().contains("Invalid speed 9"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(
            Error::DispatchFailure {
                serial: "x".to_string(),
                reason: "y".to_string()
            }
            .is_retryable()
        );
        assert!(
            Error::Api {
                status: 502,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !Error::Api {
                status: 403,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(!Error::Frame(FrameError::InvalidSerial("1".to_string())).is_retryable());
        assert!(!Error::InvalidResponse("bad".to_string()).is_retryable());
        assert!(!Error::MissingCredentials("LOGIN".to_string()).is_retryable());
    }
}
