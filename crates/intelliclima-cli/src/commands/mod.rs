//! Command implementations for the CLI.

mod config;
mod devices;
mod frame;
mod houses;
mod login;
mod send;
mod sync;

use std::path::PathBuf;

use intelliclima_store::{Registry, TokenCache};

use crate::cli::OutputFormat;
use crate::format::FormatOptions;

pub use config::cmd_config;
pub use devices::cmd_devices;
pub use frame::{cmd_crc, cmd_frame};
pub use houses::cmd_houses;
pub use login::cmd_login;
pub use send::{SendArgs, cmd_send};
pub use sync::cmd_sync;

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub opts: FormatOptions,
    pub data_dir: PathBuf,
    pub relogin: bool,
}

impl RunContext {
    pub fn token_cache(&self) -> TokenCache {
        TokenCache::in_dir(&self.data_dir)
    }

    pub fn registry(&self) -> Registry {
        Registry::in_dir(&self.data_dir)
    }
}
