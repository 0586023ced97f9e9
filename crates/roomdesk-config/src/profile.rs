//! Environment profiles and environment-variable overrides.

use std::fmt;
use std::str::FromStr;

use roomdesk_common::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::schema::RoomdeskConfig;

/// Selects the profile; e.g. `ROOMDESK_ENV=staging`.
pub const ENV_VAR: &str = "ROOMDESK_ENV";
/// Overrides the release feed base URL.
pub const UPDATE_URL_VAR: &str = "UPDATE_URL";
pub const DEV_SERVER_HOST_VAR: &str = "VITE_DEV_SERVER_HOST";
pub const DEV_SERVER_PORT_VAR: &str = "VITE_DEV_SERVER_PORT";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mock,
    Development,
    Test,
    Staging,
    #[default]
    Production,
}

impl Environment {
    pub const ALL: [Environment; 5] = [
        Environment::Mock,
        Environment::Development,
        Environment::Test,
        Environment::Staging,
        Environment::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Mock => "mock",
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Mock and development both load content from a dev server.
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Mock | Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str() == s.trim())
            .ok_or_else(|| {
                let valid: Vec<&str> = Environment::ALL.iter().map(|e| e.as_str()).collect();
                ConfigError::ValidationError(format!(
                    "invalid environment `{s}`; valid values are: {}",
                    valid.join(", ")
                ))
            })
    }
}

pub fn default_scheme(env: Environment) -> &'static str {
    match env {
        Environment::Mock => "trtcroom-mock",
        Environment::Development => "trtcroom-dev",
        Environment::Test => "trtcroom-test",
        Environment::Staging => "trtcroom-staging",
        Environment::Production => "trtcroom",
    }
}

pub fn default_feed_url(env: Environment) -> &'static str {
    match env {
        Environment::Mock => "http://localhost:3000/mock/update",
        Environment::Development => "http://dev-update.example.com",
        Environment::Test => "https://test-update.example.com",
        Environment::Staging => "https://staging-update.example.com",
        Environment::Production => "https://update.example.com",
    }
}

/// Apply environment-variable overrides on top of a loaded config.
///
/// `lookup` abstracts `std::env::var` so the overrides are testable.
pub fn apply_env_overrides<F>(config: &mut RoomdeskConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(env) = lookup(ENV_VAR).filter(|v| !v.trim().is_empty()) {
        config.app.environment = env.parse()?;
        info!(environment = %config.app.environment, "environment selected from {ENV_VAR}");
    }

    if let Some(url) = lookup(UPDATE_URL_VAR).filter(|v| !v.trim().is_empty()) {
        info!(feed_url = %url, "update feed overridden from {UPDATE_URL_VAR}");
        config.updates.feed_url = Some(url);
    }

    if config.content.dev_server_url.is_none() {
        if let (Some(host), Some(port)) = (lookup(DEV_SERVER_HOST_VAR), lookup(DEV_SERVER_PORT_VAR))
        {
            config.content.dev_server_url = Some(format!("http://{host}:{port}"));
        }
    }

    Ok(())
}
