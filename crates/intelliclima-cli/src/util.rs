//! Utility functions for CLI operations.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use intelliclima_core::{CloudClient, Credentials};
use intelliclima_store::TokenCache;
use intelliclima_types::Session;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::config::Config;

/// Build the cloud client from the config file settings.
pub fn build_client(config: &Config) -> Result<CloudClient> {
    CloudClient::new(config.api_config()).context("Failed to create cloud client")
}

/// Reuse the cached session while it is valid; otherwise log in and cache.
///
/// `relogin` skips the cache. Credentials come from `LOGIN` and `PASSWORD`.
pub async fn acquire_session(
    client: &CloudClient,
    cache: &TokenCache,
    relogin: bool,
) -> Result<Session> {
    if !relogin {
        match cache.load_valid(OffsetDateTime::now_utc()) {
            Ok(Some(session)) => {
                debug!("Using cached session from {}", cache.path().display());
                return Ok(session);
            }
            Ok(None) => {}
            // A corrupt cache is replaced by a fresh login
            Err(e) => debug!("Ignoring unreadable session cache: {}", e),
        }
    }
    login(client, cache).await
}

/// Log in with environment credentials and cache the session.
pub async fn login(client: &CloudClient, cache: &TokenCache) -> Result<Session> {
    let credentials = Credentials::from_env()
        .context("Set LOGIN and PASSWORD in the environment or a .env file")?;
    info!("Logging in as {}", credentials.login);
    let session = client.login(&credentials).await.context("Login failed")?;
    cache
        .save(&session)
        .with_context(|| format!("Failed to cache session in {}", cache.path().display()))?;
    Ok(session)
}

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use intelliclima_core::ApiConfig;

    #[tokio::test]
    async fn test_cached_session_is_reused_without_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::in_dir(dir.path());
        let session = Session::new("tok", "7", OffsetDateTime::now_utc());
        cache.save(&session).unwrap();

        // Unroutable server: any request would fail
        let client = CloudClient::new(ApiConfig::with_base_url("http://127.0.0.1:9")).unwrap();

        let reused = acquire_session(&client, &cache, false).await.unwrap();
        assert_eq!(reused.token, "tok");
        assert_eq!(reused.token_id, "7");
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output(Some(&path), "hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
