//! Devices command - list the cached registry.

use anyhow::{Context, Result};

use super::RunContext;
use crate::cli::OutputFormat;
use crate::format::format_houses_text;
use crate::util::write_output;

pub fn cmd_devices(ctx: &RunContext) -> Result<()> {
    let registry = ctx.registry();
    let houses = registry
        .load()
        .with_context(|| format!("Failed to read {}", registry.path().display()))?;

    let content = match ctx.format {
        OutputFormat::Json => ctx.opts.as_json(&houses)?,
        OutputFormat::Text if houses.is_empty() => {
            "No devices cached. Run 'intelliclima houses' and 'intelliclima sync'.\n".to_string()
        }
        OutputFormat::Text => format_houses_text(&houses, &ctx.opts),
    };
    write_output(ctx.output.as_ref(), &content)
}
