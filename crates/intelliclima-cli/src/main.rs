//! Command-line interface for IntelliClima ventilation units.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `login` | Log in and cache the session |
//! | `houses` | Discover houses and devices |
//! | `sync` | Fetch device serials and names |
//! | `devices` | List the cached registry |
//! | `send` | Set the ventilation speed |
//! | `frame` | Print a command frame (offline) |
//! | `crc` | Print the CRC-8 of hex bytes (offline) |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Environment Variables
//!
//! - `LOGIN`, `PASSWORD`: account credentials, also read from `.env`
//! - `INTELLICLIMA_DATA_DIR`: directory for `tokens.json` and `houses.json`
//! - `RUST_LOG`: log filter when neither `--verbose` nor `--quiet` is given
//! - `NO_COLOR`: disable colored output

mod cli;
mod commands;
mod config;
mod format;
mod util;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{RunContext, SendArgs};
use crate::config::Config;
use crate::format::FormatOptions;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "intelliclima", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let ctx = RunContext {
        format: cli.format,
        output: cli.output.clone(),
        opts: FormatOptions::new(cli.no_color),
        data_dir: config.data_dir(cli.data_dir.as_deref()),
        relogin: cli.relogin,
    };
    tracing::debug!("Data directory: {}", ctx.data_dir.display());

    match cli.command {
        Commands::Login => commands::cmd_login(&ctx, &config).await,
        Commands::Houses => commands::cmd_houses(&ctx, &config).await,
        Commands::Sync => commands::cmd_sync(&ctx, &config).await,
        Commands::Devices => commands::cmd_devices(&ctx),
        Commands::Send {
            speed,
            device,
            retries,
        } => {
            let args = SendArgs {
                speed,
                devices: device,
                retries,
            };
            commands::cmd_send(args, &ctx, &config).await
        }
        Commands::Frame { serial, speed } => commands::cmd_frame(&serial, speed, &ctx),
        Commands::Crc { hex } => commands::cmd_crc(&hex, &ctx),
        Commands::Config { action } => commands::cmd_config(action),
        Commands::Completions { .. } => unreachable!("handled before tracing init"),
    }
}
