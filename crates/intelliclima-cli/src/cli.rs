//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use intelliclima_types::Speed;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "intelliclima")]
#[command(author, version, about = "CLI for IntelliClima ventilation units", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Log in again even if a cached session is still valid
    #[arg(long, global = true)]
    pub relogin: bool,

    /// Directory for tokens.json and houses.json
    #[arg(long, global = true, env = "INTELLICLIMA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with LOGIN and PASSWORD and cache the session
    Login,

    /// Discover houses and devices and save the registry
    Houses,

    /// Fetch serials and names for the devices in the registry
    Sync,

    /// List devices in the registry
    Devices,

    /// Set the ventilation speed of one or more devices
    Send {
        /// Speed: off, sleep, 1/speed1, 2/speed2, 3/speed3, auto, or code:N for a raw code
        #[arg(value_parser = parse_speed)]
        speed: Speed,

        /// Device serial; repeat or comma-separate for several (default: every registry device)
        #[arg(short, long, value_delimiter = ',')]
        device: Vec<String>,

        /// Retry failed sends this many times (overrides config)
        #[arg(long)]
        retries: Option<u32>,
    },

    /// Print the command frame for a serial and speed, without sending it
    Frame {
        /// Device serial (8 hex characters)
        serial: String,

        /// Speed: off, sleep, 1/speed1, 2/speed2, 3/speed3, auto, or code:N for a raw code
        #[arg(value_parser = parse_speed)]
        speed: Speed,
    },

    /// Print the CRC-8 of a hex string
    Crc {
        /// Hex-encoded bytes, e.g. 31377ABC000E2F005000000402
        hex: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_speed(s: &str) -> Result<Speed, String> {
    s.parse::<Speed>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_send_parses_names_codes_and_devices() {
        let cli = Cli::parse_from(["intelliclima", "send", "auto", "-d", "31377ABC,DEADBEEF"]);
        match cli.command {
            Commands::Send { speed, device, .. } => {
                assert_eq!(speed, Speed::Auto);
                assert_eq!(device, vec!["31377ABC", "DEADBEEF"]);
            }
            _ => panic!("expected send"),
        }

        let cli = Cli::parse_from(["intelliclima", "send", "2"]);
        match cli.command {
            Commands::Send { speed, device, .. } => {
                assert_eq!(speed, Speed::Speed2);
                assert!(device.is_empty());
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_send_rejects_unknown_speed() {
        assert!(Cli::try_parse_from(["intelliclima", "send", "turbo"]).is_err());
        assert!(Cli::try_parse_from(["intelliclima", "send", "5"]).is_err());
        assert!(Cli::try_parse_from(["intelliclima", "send", "code:5"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["intelliclima", "devices", "--format", "json", "--relogin"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.relogin);
    }
}
