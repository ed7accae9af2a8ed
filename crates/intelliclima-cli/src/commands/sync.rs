//! Sync command - fetch serials and names for registry devices.

use anyhow::{Context, Result, bail};
use intelliclima_core::apply_details;
use tracing::{info, warn};

use super::RunContext;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::format::format_houses_text;
use crate::util::{acquire_session, build_client, write_output};

pub async fn cmd_sync(ctx: &RunContext, config: &Config) -> Result<()> {
    let registry = ctx.registry();
    let mut houses = registry
        .load()
        .with_context(|| format!("Failed to read {}", registry.path().display()))?;
    let ids: Vec<i64> = houses
        .iter()
        .flat_map(|h| h.devices.iter().map(|d| d.id))
        .collect();
    if ids.is_empty() {
        bail!("No devices in the registry. Run 'intelliclima houses' first.");
    }

    let client = build_client(config)?;
    let session = acquire_session(&client, &ctx.token_cache(), ctx.relogin).await?;
    let details = client
        .device_details(&session, &ids)
        .await
        .context("Failed to fetch device details")?;

    let updated = apply_details(&mut houses, &details);
    info!("Updated {} of {} devices", updated, ids.len());
    for device in houses.iter().flat_map(|h| h.devices.iter()) {
        if device.serial.is_none() {
            warn!("No serial known for {}", device.label());
        }
    }

    registry
        .save(&houses)
        .with_context(|| format!("Failed to save {}", registry.path().display()))?;

    let content = match ctx.format {
        OutputFormat::Json => ctx.opts.as_json(&houses)?,
        OutputFormat::Text => format_houses_text(&houses, &ctx.opts),
    };
    write_output(ctx.output.as_ref(), &content)
}
