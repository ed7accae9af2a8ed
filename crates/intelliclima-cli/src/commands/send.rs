//! Send command - set the ventilation speed.

use anyhow::{Context, Result, bail};
use intelliclima_core::{DispatchTarget, Dispatcher};
use intelliclima_types::{Device, Speed};
use tracing::warn;

use super::RunContext;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::format::format_report_text;
use crate::util::{acquire_session, build_client, write_output};

/// Arguments for the send command.
pub struct SendArgs {
    pub speed: Speed,
    pub devices: Vec<String>,
    pub retries: Option<u32>,
}

/// Send the speed to each target and print one line per device.
///
/// Fails after printing the report when any device failed.
pub async fn cmd_send(args: SendArgs, ctx: &RunContext, config: &Config) -> Result<()> {
    let registry = ctx.registry();
    let known = match registry.devices() {
        Ok(devices) => devices,
        // Explicit serials only need the registry for labels
        Err(e) if !args.devices.is_empty() => {
            warn!("Ignoring unreadable registry {}: {}", registry.path().display(), e);
            Vec::new()
        }
        Err(e) => Err(e).with_context(|| {
            format!("Failed to read device registry {}", registry.path().display())
        })?,
    };
    let targets = resolve_targets(&args.devices, &known);
    if targets.is_empty() {
        bail!(
            "No devices to command. Pass --device SERIAL, or run 'intelliclima houses' \
             and 'intelliclima sync' to build the registry."
        );
    }

    let client = build_client(config)?;
    let session = acquire_session(&client, &ctx.token_cache(), ctx.relogin).await?;
    let dispatcher =
        Dispatcher::new(&client, session).with_retry(config.retry_config(args.retries));

    let report = dispatcher.send_batch(targets, args.speed).await;

    let content = match ctx.format {
        OutputFormat::Json => ctx.opts.as_json(&report)?,
        OutputFormat::Text => format_report_text(&report, &ctx.opts),
    };
    write_output(ctx.output.as_ref(), &content)?;

    if !report.is_success() {
        bail!(
            "{} of {} devices failed",
            report.failed_count(),
            report.outcomes.len()
        );
    }
    Ok(())
}

/// Explicit serials win; otherwise every registry device in order.
fn resolve_targets(serials: &[String], known: &[Device]) -> Vec<DispatchTarget> {
    if serials.is_empty() {
        return known.iter().map(DispatchTarget::from).collect();
    }
    serials
        .iter()
        .map(|serial| {
            known
                .iter()
                .find(|d| {
                    d.serial
                        .as_deref()
                        .is_some_and(|s| s.eq_ignore_ascii_case(serial))
                })
                .map(|d| DispatchTarget {
                    serial: Some(serial.clone()),
                    ..DispatchTarget::from(d)
                })
                .unwrap_or_else(|| DispatchTarget::serial(serial.clone()))
        })
        .collect()
}
