//! Command dispatch to one or many devices.
//!
//! The [`Dispatcher`] owns a session and a [`Relay`]. For every command it
//! builds a fresh [`Frame`], sends it, and classifies the result. Batches
//! run one device at a time and keep going past failures.

use intelliclima_types::{Device, DeviceSerial, Frame, Session, Speed, encode_speed_frame};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::retry::{RetryConfig, with_retry};
use crate::traits::{Relay, RelayResponse};

/// A command the relay accepted.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub serial: DeviceSerial,
    pub speed: Speed,
    pub frame: Frame,
    pub response: RelayResponse,
}

/// One device to command in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTarget {
    pub device_id: Option<i64>,
    pub label: String,
    pub serial: Option<String>,
}

impl DispatchTarget {
    /// A target known only by its serial.
    pub fn serial(serial: impl Into<String>) -> Self {
        let serial = serial.into();
        Self {
            device_id: None,
            label: serial.clone(),
            serial: Some(serial),
        }
    }
}

impl From<&Device> for DispatchTarget {
    fn from(device: &Device) -> Self {
        Self {
            device_id: Some(device.id),
            label: device.label(),
            serial: device.serial.clone(),
        }
    }
}

/// Result for one device of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The relay accepted the frame.
    Sent { frame: String },
    /// No serial is known for the device, nothing was sent.
    Skipped,
    /// Encoding or transmission failed.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceOutcome {
    pub device_id: Option<i64>,
    pub label: String,
    pub serial: Option<String>,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

/// Per-device results of a batch, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub speed: Speed,
    pub outcomes: Vec<DeviceOutcome>,
}

impl BatchReport {
    pub fn sent_count(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Sent { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Skipped))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Failed { .. }))
    }

    /// True when no device failed. Skipped devices do not count as failures.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    fn count(&self, pred: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Sends speed commands through a relay with an explicit session.
#[derive(Debug)]
pub struct Dispatcher<R> {
    relay: R,
    session: Session,
    retry: RetryConfig,
}

impl<R: Relay> Dispatcher<R> {
    /// Create a dispatcher that does not retry.
    pub fn new(relay: R, session: Session) -> Self {
        Self {
            relay,
            session,
            retry: RetryConfig::none(),
        }
    }

    /// Retry transport failures per device with the given policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Encode and send one speed command.
    ///
    /// A bad serial or speed fails with [`Error::Frame`] before anything is
    /// sent. Transport failures are reported as [`Error::DispatchFailure`].
    pub async fn send_speed(&self, serial: &str, speed: u8) -> Result<Dispatched> {
        let frame = encode_speed_frame(serial, speed)?;
        let serial: DeviceSerial = serial.parse()?;
        let speed = Speed::try_from(speed)?;
        info!("Sending {} to device {}: {}", speed, serial, frame);

        let response = with_retry(&self.retry, "send_trama", || {
            self.relay.send_frame(&self.session, &frame)
        })
        .await
        .map_err(|e| Error::DispatchFailure {
            serial: serial.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Dispatched {
            serial,
            speed,
            frame,
            response,
        })
    }

    /// Send `speed` to every target in order.
    ///
    /// Never fails as a whole: each target gets its own outcome, and a failed
    /// target does not prevent the following ones from being sent.
    pub async fn send_batch<I>(&self, targets: I, speed: Speed) -> BatchReport
    where
        I: IntoIterator<Item = DispatchTarget>,
    {
        let mut outcomes = Vec::new();
        for target in targets {
            let status = match target.serial.as_deref() {
                None => {
                    warn!("No serial known for {}, skipping", target.label);
                    OutcomeStatus::Skipped
                }
                Some(serial) => match self.send_speed(serial, speed.code()).await {
                    Ok(dispatched) => OutcomeStatus::Sent {
                        frame: dispatched.frame.to_string(),
                    },
                    Err(e) => {
                        warn!("Command to {} failed: {}", target.label, e);
                        OutcomeStatus::Failed {
                            error: e.to_string(),
                        }
                    }
                },
            };
            outcomes.push(DeviceOutcome {
                device_id: target.device_id,
                label: target.label,
                serial: target.serial,
                status,
            });
        }

        let report = BatchReport { speed, outcomes };
        info!(
            "Batch {}: {} sent, {} failed, {} skipped",
            speed,
            report.sent_count(),
            report.failed_count(),
            report.skipped_count()
        );
        report
    }

    /// Send `speed` to registry devices.
    pub async fn send_to_devices<'a, I>(&self, devices: I, speed: Speed) -> BatchReport
    where
        I: IntoIterator<Item = &'a Device>,
    {
        self.send_batch(devices.into_iter().map(DispatchTarget::from), speed)
            .await
    }
}
