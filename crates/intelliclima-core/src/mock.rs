//! Mock relay for testing without the vendor cloud.
//!
//! [`MockRelay`] implements [`Relay`], records every frame it is given and
//! can be told to fail for particular device serials.
//!
//! # Example
//!
//! ```
//! use intelliclima_core::{Dispatcher, MockRelay};
//! use intelliclima_types::{Session, Speed};
//! use time::OffsetDateTime;
//!
//! #[tokio::main]
//! async fn main() {
//!     let relay = MockRelay::new().fail_for("DEADBEEF");
//!     let session = Session::new("token", "1", OffsetDateTime::now_utc());
//!     let dispatcher = Dispatcher::new(&relay, session);
//!
//!     assert!(dispatcher.send_speed("31377ABC", Speed::Auto.code()).await.is_ok());
//!     assert!(dispatcher.send_speed("DEADBEEF", Speed::Auto.code()).await.is_err());
//!     assert_eq!(relay.sent().await.len(), 1);
//! }
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use intelliclima_types::{Frame, Session};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::traits::{Relay, RelayResponse};

/// A relay that accepts frames in memory.
#[derive(Debug, Default)]
pub struct MockRelay {
    sent: RwLock<Vec<Frame>>,
    failing_serials: HashSet<String>,
    attempts: AtomicU32,
    /// Number of calls to fail before accepting (0 = never fail this way).
    remaining_failures: AtomicU32,
}

impl MockRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every frame addressed to `serial` with a 503.
    #[must_use]
    pub fn fail_for(mut self, serial: &str) -> Self {
        self.failing_serials.insert(serial.to_ascii_uppercase());
        self
    }

    /// Reject the next `count` frames, whatever their serial, with a 503.
    #[must_use]
    pub fn fail_next(self, count: u32) -> Self {
        self.remaining_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Frames accepted so far, in order.
    pub async fn sent(&self) -> Vec<Frame> {
        self.sent.read().await.clone()
    }

    /// Number of send attempts, accepted or not.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Relay for MockRelay {
    async fn send_frame(&self, session: &Session, frame: &Frame) -> Result<RelayResponse> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if session.token.is_empty() {
            return Err(Error::Api {
                status: 401,
                message: "missing token".to_string(),
            });
        }

        let command = Frame::parse(frame.as_str())?;
        if self.failing_serials.contains(command.serial.as_str()) {
            return Err(Error::Api {
                status: 503,
                message: format!("mock relay rejects {}", command.serial),
            });
        }

        let consumed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if consumed {
            return Err(Error::Api {
                status: 503,
                message: "mock relay busy".to_string(),
            });
        }

        self.sent.write().await.push(frame.clone());
        Ok(RelayResponse {
            status: 200,
            body: r#"{"status":"OK"}"#.to_string(),
        })
    }
}
