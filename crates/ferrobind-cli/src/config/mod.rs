//! Configuration loading for Ferrobind.
//! Uses the path given on the command line, then the FERROBIND_CONFIG env var,
//! then ferrobind.toml in the current directory. Without any of them the
//! defaults apply and command-line flags supply the rest.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ferrobind_common::SelectionConfig;
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "FERROBIND_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "ferrobind.toml";


/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Pick the config file to read. An explicit path or env var must exist;
/// the default file is optional.
pub fn resolve_path(explicit: Option<&Path>, env_value: Option<String>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        let path = PathBuf::from(value);
        if !path.exists() {
            anyhow::bail!("Config file from {} not found: {}", CONFIG_ENV, path.display());
        }
        return Ok(Some(path));
    }

    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
    Ok(default.exists().then_some(default))
}

/// Load the run configuration.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<(SelectionConfig, ConfigSource)> {
    let path = resolve_path(explicit, std::env::var(CONFIG_ENV).ok())?;
    match path {
        Some(path) => {
            let config = SelectionConfig::from_path(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            info!("Configuration loaded from {}", path.display());
            Ok((config, ConfigSource::File(path)))
        }
        None => {
            debug!("No config file found, using defaults");
            Ok((SelectionConfig::default(), ConfigSource::Defaults))
        }
    }
}
