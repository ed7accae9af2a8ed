//! Output formatting for text and JSON.

use std::fmt::Write as _;

use anyhow::Result;
use intelliclima_core::{BatchReport, OutcomeStatus};
use intelliclima_types::{House, Session};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self { no_color }
    }

    /// Serialize as pretty JSON with a trailing newline.
    pub fn as_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)? + "\n")
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if self.no_color {
            return text.to_string();
        }
        match tone {
            Tone::Good => text.green().to_string(),
            Tone::Warn => text.yellow().to_string(),
            Tone::Bad => text.red().to_string(),
            Tone::Dim => text.dimmed().to_string(),
        }
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Good,
    Warn,
    Bad,
    Dim,
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

#[must_use]
pub fn format_houses_text(houses: &[House], opts: &FormatOptions) -> String {
    if houses.is_empty() {
        return "No houses found\n".to_string();
    }
    let mut out = String::new();
    for house in houses {
        let _ = writeln!(
            out,
            "{} (house {}), {} devices",
            house.name,
            house.id,
            house.devices.len()
        );
        for device in &house.devices {
            let master = if device.is_master {
                opts.paint(" [master]", Tone::Dim)
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "  {:<8} {:<10} {:<8} {}{}",
                device.id,
                device.device_type,
                or_dash(device.serial.as_deref()),
                or_dash(device.name.as_deref()),
                master
            );
        }
    }
    out
}

#[must_use]
pub fn format_report_text(report: &BatchReport, opts: &FormatOptions) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        let serial = or_dash(outcome.serial.as_deref());
        let line = match &outcome.status {
            OutcomeStatus::Sent { frame } => format!(
                "{} {} ({}) {}",
                opts.paint("SENT   ", Tone::Good),
                outcome.label,
                serial,
                opts.paint(frame, Tone::Dim)
            ),
            OutcomeStatus::Skipped => format!(
                "{} {} (no serial, run `intelliclima sync`)",
                opts.paint("SKIPPED", Tone::Warn),
                outcome.label
            ),
            OutcomeStatus::Failed { error } => format!(
                "{} {} ({}) {}",
                opts.paint("FAILED ", Tone::Bad),
                outcome.label,
                serial,
                error
            ),
        };
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(
        out,
        "{}: {} sent, {} failed, {} skipped",
        report.speed,
        report.sent_count(),
        report.failed_count(),
        report.skipped_count()
    );
    out
}

#[must_use]
pub fn format_session_text(session: &Session) -> String {
    format!(
        "Logged in (token id {}), session valid until {}\n",
        session.token_id,
        session.expires_at()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use intelliclima_core::DeviceOutcome;
    use intelliclima_types::{Device, Frame, Speed};

    fn plain() -> FormatOptions {
        FormatOptions::new(true)
    }

    #[test]
    fn test_houses_text() {
        let houses = vec![House::new(
            1201,
            "Casa",
            vec![
                Device::new(31377, true, "ECO", 1201)
                    .with_serial("31377ABC")
                    .with_name("Sala"),
                Device::new(31378, false, "ECO", 1201),
            ],
        )];
        let text = format_houses_text(&houses, &plain());
        assert!(text.starts_with("Casa (house 1201), 2 devices"));
        assert!(text.contains("31377ABC"));
        assert!(text.contains("Sala [master]"));
        assert!(text.contains("31378"));
        assert_eq!(format_houses_text(&[], &plain()), "No houses found\n");
    }

    #[test]
    fn test_report_text() {
        // The fixture is a frame the firmware would accept
        assert!(Frame::parse("0A31377ABC000E2F005000000410C60D").is_ok());
        let report = BatchReport {
            speed: Speed::Auto,
            outcomes: vec![
                DeviceOutcome {
                    device_id: Some(1),
                    label: "Sala".to_string(),
                    serial: Some("31377ABC".to_string()),
                    status: OutcomeStatus::Sent {
                        frame: "0A31377ABC000E2F005000000410C60D".to_string(),
                    },
                },
                DeviceOutcome {
                    device_id: Some(2),
                    label: "device 2".to_string(),
                    serial: None,
                    status: OutcomeStatus::Skipped,
                },
                DeviceOutcome {
                    device_id: Some(3),
                    label: "Camera".to_string(),
                    serial: Some("DEADBEEF".to_string()),
                    status: OutcomeStatus::Failed {
                        error: "timeout".to_string(),
                    },
                },
            ],
        };
        let text = format_report_text(&report, &plain());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("SENT"));
        assert!(lines[0].contains("0A31377ABC000E2F005000000410C60D"));
        assert!(lines[1].starts_with("SKIPPED"));
        assert!(lines[2].contains("timeout"));
        assert_eq!(lines[3], "Auto: 1 sent, 1 failed, 1 skipped");
    }

    #[test]
    fn test_json_has_trailing_newline() {
        let json = plain().as_json(&[1, 2]).unwrap();
        assert!(json.ends_with("]\n"));
    }
}
