//! Configuration resolution for the CLI
//!
//! A config file is optional. Without one the built-in defaults apply; with
//! one, its fields override the defaults. Command-line flags override both.

use anyhow::{Context, Result};
use rail_animation::RailConfig;
use rail_core::Axis;
use std::path::Path;

/// Name looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "rail.toml";

/// Load the effective configuration
pub fn resolve(path: Option<&Path>, axis: Option<Axis>) -> Result<RailConfig> {
    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    let path = path.or_else(|| fallback.exists().then_some(fallback));

    let config = match path {
        Some(path) => load(path)?,
        None => RailConfig::default(),
    };

    Ok(match axis {
        Some(axis) => config.with_axis(axis),
        None => config,
    })
}

fn load(path: &Path) -> Result<RailConfig> {
    tracing::debug!("Using {}", path.display());
    RailConfig::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))
}
