//! Session credential cache.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use intelliclima_types::Session;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::StoredTokens;
use crate::{default_data_dir, read_json, write_json};

/// File name of the credential cache inside the data directory.
pub const TOKENS_FILE: &str = "tokens.json";

/// `tokens.json` holding the last session.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Cache at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache in `dir/tokens.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(TOKENS_FILE))
    }

    /// Cache in the default data directory.
    pub fn open_default() -> Self {
        Self::in_dir(default_data_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached session, expired or not. `None` if nothing is cached.
    pub fn load(&self) -> Result<Option<Session>> {
        match read_json::<StoredTokens>(&self.path)? {
            Some(stored) => Ok(Some(stored.to_session()?)),
            None => Ok(None),
        }
    }

    /// The cached session if it is still valid at `now`.
    pub fn load_valid(&self, now: OffsetDateTime) -> Result<Option<Session>> {
        let session = self.load()?;
        Ok(session.filter(|s| {
            let valid = !s.is_expired_at(now);
            if !valid {
                debug!("Cached session expired at {}", s.expires_at());
            }
            valid
        }))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        write_json(&self.path, &StoredTokens::from_session(session))?;
        info!("Session cached in {}", self.path.display());
        Ok(())
    }

    /// Remove the cache file. Succeeds if there is none.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
