mod config;
mod env;
mod info;
mod plan;

use std::path::Path;

use anyhow::{Context, Result};
use pkgdef_core::{Manifest, Settings, hdcycles};
use tracing::debug;

use crate::output::OutputFormat;

pub use config::cmd_config;
pub use env::{EnvArgs, cmd_env};
pub use info::cmd_info;
pub use plan::cmd_plan;

/// State shared by every command: the manifest and the effective settings
pub struct Session {
    pub manifest: Manifest,
    pub settings: Settings,
    pub format: OutputFormat,
}

impl Session {
    /// Load the manifest and merge CLI overrides over environment settings
    pub fn load(manifest: Option<&Path>, platform: Option<String>, format: OutputFormat) -> Result<Self> {
        let mut settings = Settings::from_env().context("Failed to read settings")?;
        if platform.is_some() {
            settings.platform = platform;
        }

        let manifest = match manifest {
            Some(path) => Manifest::load(path)
                .with_context(|| format!("Failed to load manifest: {}", path.display()))?,
            None => {
                debug!("using built-in hdcycles manifest");
                hdcycles()
            }
        };

        Ok(Self {
            manifest,
            settings,
            format,
        })
    }
}
