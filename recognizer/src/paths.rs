//! XDG directory helpers for configuration and logging.

use anyhow::{Context, Result};
use std::path::PathBuf;
use xdg::BaseDirectories;

const APP_PREFIX: &str = "persephone-elan";

/// Config file path: `$XDG_CONFIG_HOME/persephone-elan/config.toml`.
pub fn config_path() -> Result<PathBuf> {
    let xdg = BaseDirectories::with_prefix(APP_PREFIX);
    let config_dir = xdg
        .get_config_home()
        .context("Failed to get XDG config directory (HOME not set?)")?;
    Ok(config_dir.join("config.toml"))
}

/// Log file path: `$XDG_STATE_HOME/persephone-elan/recognizer.log`.
///
/// Creates the state directory if needed. Logs go to a file because stdout
/// belongs to the ELAN recognizer protocol.
pub fn log_path() -> Result<PathBuf> {
    let xdg = BaseDirectories::with_prefix(APP_PREFIX);
    let state_dir = xdg
        .get_state_home()
        .context("Failed to get XDG state directory (HOME not set?)")?;
    std::fs::create_dir_all(&state_dir).context("Failed to create state directory")?;
    Ok(state_dir.join("recognizer.log"))
}
