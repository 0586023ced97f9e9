//! TOML config file loading.

use std::path::{Path, PathBuf};

use roomdesk_common::ConfigError;
use tracing::info;

use crate::schema::RoomdeskConfig;

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. Validation is left to the
/// caller so environment overrides can be applied first.
pub fn load_from_path(path: &Path) -> Result<RoomdeskConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: RoomdeskConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/roomdesk/config.toml`
/// On Linux: `~/.config/roomdesk/config.toml`
///
/// A missing file is not an error; defaults are returned.
pub fn load_default() -> Result<RoomdeskConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, using defaults", path.display());
        return Ok(RoomdeskConfig::default());
    }

    load_from_path(&path)
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::ParseError("could not determine config directory".into())
    })?;
    Ok(config_dir.join("roomdesk").join("config.toml"))
}
