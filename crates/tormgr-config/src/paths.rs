//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate with fallbacks.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/tormgr/`, `~/.cache/tormgr/`
//! - macOS: `~/Library/Application Support/tormgr/`, `~/Library/Caches/tormgr/`
//! - Windows: `%APPDATA%\tormgr\`, `%LOCALAPPDATA%\tormgr\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "tormgr";

/// Get the application config directory
/// Returns ~/.config/tormgr/ on Linux, ~/Library/Application Support/tormgr/ on macOS
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the application cache directory
/// Returns ~/.cache/tormgr/ on Linux, ~/Library/Caches/tormgr/ on macOS
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get path to the persisted session store
pub fn session_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("session.json"))
}

/// Get path to app config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
