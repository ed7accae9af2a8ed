//! Config command.

use anyhow::{Context, Result, bail};

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn cmd_config(action: ConfigAction) -> Result<()> {
    let path = Config::path();
    match action {
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Show => {
            let config = Config::load();
            let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("# {}", path.display());
            print!("{content}");
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Config::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}
