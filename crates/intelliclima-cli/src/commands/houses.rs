//! Houses command - discover houses and devices.

use anyhow::{Context, Result};
use intelliclima_types::House;
use tracing::debug;

use super::RunContext;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::format::format_houses_text;
use crate::util::{acquire_session, build_client, write_output};

pub async fn cmd_houses(ctx: &RunContext, config: &Config) -> Result<()> {
    let client = build_client(config)?;
    let session = acquire_session(&client, &ctx.token_cache(), ctx.relogin).await?;

    let mut houses = client
        .houses(&session)
        .await
        .context("Failed to list houses")?;

    let registry = ctx.registry();
    match registry.load() {
        Ok(previous) => keep_known_details(&mut houses, &previous),
        Err(e) => debug!("Previous registry not readable: {}", e),
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

/// Discovery returns devices without serial or name. Carry over what an
/// earlier sync stored for the same device id.
fn keep_known_details(houses: &mut [House], previous: &[House]) {
    let known = previous.iter().flat_map(|h| h.devices.iter());
    for device in houses.iter_mut().flat_map(|h| h.devices.iter_mut()) {
        if let Some(old) = known.clone().find(|old| old.id == device.id) {
            device.serial = device.serial.take().or_else(|| old.serial.clone());
            device.name = device.name.take().or_else(|| old.name.clone());
        }
    }
}
