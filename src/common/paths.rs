use anyhow::{Context, Result};
use std::path::PathBuf;

/// Directory holding `config.toml`
pub fn v_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("v"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(v_config_dir()?.join("config.toml"))
}

/// Per-user XDG data root (`~/.local/share`)
pub fn user_data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        home.join(".local/share")
    })
}

/// Expand a leading `~` and environment variables in a configured path.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}
