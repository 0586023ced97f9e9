//! Roomdesk configuration system.
//!
//! TOML-based configuration with per-environment profiles. Every section
//! uses serde defaults so partial configs work out of the box; the active
//! profile fills in the scheme name and update feed when they are unset.

pub mod profile;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use profile::Environment;
pub use schema::RoomdeskConfig;

use std::path::Path;

use roomdesk_common::ConfigError;

/// Load, apply environment overrides, and validate.
///
/// `path` overrides the platform default location. A missing file at the
/// default location yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<RoomdeskConfig, ConfigError> {
    let mut config = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };

    profile::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[protocol]\nscheme = \"roomdesk-test\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.scheme(), "roomdesk-test");
    }
}
