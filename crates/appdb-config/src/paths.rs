//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/appdb/`
//! - macOS: `~/Library/Application Support/appdb/`
//! - Windows: `%APPDATA%\appdb\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "appdb";

/// Get the application config directory
/// Returns ~/.config/appdb/ on Linux, ~/Library/Application Support/appdb/ on macOS
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get path to app config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get path to the ignored apps file
pub fn ignored_apps_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("ignored-apps.json"))
}
