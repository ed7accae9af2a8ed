//! Local persistence for the IntelliClima client.
//!
//! Two JSON files live in the data directory:
//!
//! - `tokens.json`: the last session credential, reused until it expires
//! - `houses.json`: the device registry built by discovery and sync
//!
//! # Example
//!
//! ```no_run
//! use intelliclima_store::{Registry, TokenCache};
//! use time::OffsetDateTime;
//!
//! let tokens = TokenCache::open_default();
//! if let Some(session) = tokens.load_valid(OffsetDateTime::now_utc())? {
//!     println!("cached session valid until {}", session.expires_at());
//! }
//!
//! let houses = Registry::open_default().load()?;
//! println!("{} houses cached", houses.len());
//! # Ok::<(), intelliclima_store::Error>(())
//! ```

mod error;
mod models;
mod registry;
mod tokens;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::{Error, Result};
pub use models::StoredTokens;
pub use registry::{HOUSES_FILE, Registry};
pub use tokens::{TOKENS_FILE, TokenCache};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "INTELLICLIMA_DATA_DIR";

/// Default data directory following platform conventions.
///
/// - Linux: `~/.local/share/intelliclima`
/// - macOS: `~/Library/Application Support/intelliclima`
/// - Windows: `C:\Users\<user>\AppData\Local\intelliclima`
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("intelliclima")
}

/// Data directory from `INTELLICLIMA_DATA_DIR`, or the platform default.
pub fn data_dir_from_env() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_data_dir)
}

/// Read a JSON file, or `None` when it does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write pretty-printed JSON, creating the parent directory if needed.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)?;
    Ok(())
}
