//! Config file bootstrap command.

use std::path::{Path, PathBuf};

use crate::config::{self, Config, ConfigError};

/// Write the default configuration to `path` (or the OS config location)
pub fn cmd_init_config(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = target_path(path)?;

    write_default(&path, force)?;

    println!("✓ Wrote default config to {}", path.display());
    println!("  Fill in client_id and client_secret under [credentials],");
    println!("  or pass --client-id/--client-secret (CLIENT_ID/CLIENT_SECRET).");
    Ok(())
}

fn target_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => config::config_path().ok_or(ConfigError::NoConfigDir),
    }
}

fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    config::save_to(&Config::default(), path)
}
