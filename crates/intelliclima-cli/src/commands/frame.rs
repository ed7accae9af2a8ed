//! Offline commands: frame encoding and CRC.

use anyhow::{Context, Result};
use intelliclima_types::{DeviceSerial, Speed, crc8_hex, encode_speed_frame};
use serde::Serialize;

use super::RunContext;
use crate::cli::OutputFormat;
use crate::util::write_output;

#[derive(Serialize)]
struct FrameOutput<'a> {
    serial: &'a str,
    speed: Speed,
    code: u8,
    frame: &'a str,
    checksum: &'a str,
}

pub fn cmd_frame(serial: &str, speed: Speed, ctx: &RunContext) -> Result<()> {
    let frame = encode_speed_frame(serial, speed.code())
        .with_context(|| format!("Cannot encode a frame for {serial}"))?;
    let serial: DeviceSerial = serial.parse()?;

    let content = match ctx.format {
        OutputFormat::Json => ctx.opts.as_json(&FrameOutput {
            serial: serial.as_str(),
            speed,
            code: speed.code(),
            frame: frame.as_str(),
            checksum: frame.checksum(),
        })?,
        OutputFormat::Text => format!("{frame}\n"),
    };
    write_output(ctx.output.as_ref(), &content)
}

pub fn cmd_crc(hex: &str, ctx: &RunContext) -> Result<()> {
    let crc = crc8_hex(hex).context("Cannot compute CRC")?;

    let content = match ctx.format {
        OutputFormat::Json => ctx.opts.as_json(&serde_json::json!({ "crc": crc }))?,
        OutputFormat::Text => format!("{crc}\n"),
    };
    write_output(ctx.output.as_ref(), &content)
}
