//! Cloud client and command dispatcher for IntelliClima ventilation units.
//!
//! IntelliClima (Fantini Cosmi) units are commanded through the vendor
//! cloud: the client logs in, discovers houses and devices, and posts
//! hex-encoded frames ("trame") to a relay that forwards them to the unit.
//!
//! # Features
//!
//! - **Login**: SHA-256 password login returning an explicit [`Session`]
//! - **Discovery**: houses, devices, and device serials
//! - **Dispatch**: speed commands to one device or a batch, with per-device
//!   outcomes
//! - **Retry**: optional bounded retry with exponential backoff
//! - **Testing**: [`MockRelay`] records frames and injects failures
//!
//! # Quick Start
//!
//! ```no_run
//! use intelliclima_core::{ApiConfig, CloudClient, Credentials, Dispatcher, Speed};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CloudClient::new(ApiConfig::default())?;
//!     let session = client.login(&Credentials::from_env()?).await?;
//!
//!     let houses = client.houses(&session).await?;
//!     let devices: Vec<_> = houses.iter().flat_map(|h| h.devices.clone()).collect();
//!
//!     let dispatcher = Dispatcher::new(&client, session);
//!     let report = dispatcher.send_to_devices(&devices, Speed::Auto).await;
//!     println!("{} sent, {} failed", report.sent_count(), report.failed_count());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mock;
pub mod retry;
pub mod traits;

pub use api::DeviceDetails;
pub use client::{CloudClient, Credentials, apply_details};
pub use config::{ApiConfig, ApiFolder, DeviceIdField};
pub use dispatch::{
    BatchReport, DeviceOutcome, DispatchTarget, Dispatched, Dispatcher, OutcomeStatus,
};
pub use error::{Error, Result};
pub use mock::MockRelay;
pub use retry::{RetryConfig, with_retry};
pub use traits::{Relay, RelayResponse};

// Re-export from intelliclima-types
pub use intelliclima_types::{
    Device, DeviceSerial, Frame, FrameError, House, Session, Speed, SpeedCommand, crc8, crc8_hex,
    encode_speed_frame,
};
