//! Trait abstraction over the command relay.
//!
//! [`Relay`] lets the [`crate::Dispatcher`] work with the real cloud
//! ([`crate::CloudClient`]) or with [`crate::MockRelay`] in tests.

use std::sync::Arc;

use async_trait::async_trait;
use intelliclima_types::{Frame, Session};

use crate::error::Result;

/// What the relay answered to an accepted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body, as sent by the vendor.
    pub body: String,
}

/// Something that can forward a frame to a physical device.
///
/// # Example
///
/// ```ignore
/// use intelliclima_core::{Relay, Result};
///
/// async fn forward<R: Relay>(relay: &R, session: &Session, frame: &Frame) -> Result<()> {
///     relay.send_frame(session, frame).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Relay: Send + Sync {
    /// Send one frame on behalf of `session`.
    ///
    /// Returns an error for network failures and non-success statuses.
    async fn send_frame(&self, session: &Session, frame: &Frame) -> Result<RelayResponse>;
}

#[async_trait]
impl<T: Relay + ?Sized> Relay for &T {
    async fn send_frame(&self, session: &Session, frame: &Frame) -> Result<RelayResponse> {
        (**self).send_frame(session, frame).await
    }
}

#[async_trait]
impl<T: Relay + ?Sized> Relay for Arc<T> {
    async fn send_frame(&self, session: &Session, frame: &Frame) -> Result<RelayResponse> {
        (**self).send_frame(session, frame).await
    }
}
