//! Configuration schema. Every section derives serde defaults so a config
//! file only needs the keys it overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::profile::{self, Environment};

// =============================================================================
// App Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub environment: Environment,
    /// Packaged builds receive one fewer leading launch argument than
    /// unpacked (script-hosted) runs.
    pub packaged: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            packaged: true,
        }
    }
}

// =============================================================================
// Protocol Config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Deep-link scheme. Falls back to the environment profile when unset.
    pub scheme: Option<String>,
}

// =============================================================================
// Updates Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatesConfig {
    pub enabled: bool,
    /// Base URL of the release feed. Falls back to the environment profile.
    pub feed_url: Option<String>,
    pub channel: String,
    pub allow_prerelease: bool,
    /// Platform identifier used to pick the feed document.
    pub platform: String,
    /// Directory name under the OS cache dir for downloaded artifacts.
    pub cache_dir_name: String,
    /// Delay before the first automatic check, in seconds.
    pub startup_delay_secs: u64,
    /// Interval between automatic checks, in seconds.
    pub check_interval_secs: u64,
}

impl Default for UpdatesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            feed_url: None,
            channel: "latest".to_string(),
            allow_prerelease: false,
            platform: std::env::consts::OS.to_string(),
            cache_dir_name: "roomdesk-updater-cache".to_string(),
            startup_delay_secs: 3,
            check_interval_secs: 60 * 60,
        }
    }
}

// =============================================================================
// Windows Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowsConfig {
    pub main_min_width: u32,
    pub main_min_height: u32,
    pub whiteboard_width: u32,
    pub whiteboard_height: u32,
    /// Pixel tolerance when matching a screen-share origin to a display.
    pub display_tolerance_px: u32,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            main_min_width: 1200,
            main_min_height: 640,
            whiteboard_width: 1280,
            whiteboard_height: 720,
            display_tolerance_px: 100,
        }
    }
}

// =============================================================================
// Content Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Dev server serving the renderer. Only used by development profiles.
    pub dev_server_url: Option<String>,
    /// Renderer entry document for packaged runs.
    pub renderer_entry: PathBuf,
    pub preload: Option<PathBuf>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dev_server_url: None,
            renderer_entry: PathBuf::from("renderer/index.html"),
            preload: None,
        }
    }
}

// =============================================================================
// Logging Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "roomdesk=info".to_string(),
        }
    }
}

// =============================================================================
// Root Config
// =============================================================================

/// Root configuration for Roomdesk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomdeskConfig {
    pub app: AppConfig,
    pub protocol: ProtocolConfig,
    pub updates: UpdatesConfig,
    pub windows: WindowsConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}

impl RoomdeskConfig {
    /// The deep-link scheme in effect (explicit or from the profile).
    pub fn scheme(&self) -> &str {
        self.protocol
            .scheme
            .as_deref()
            .unwrap_or_else(|| profile::default_scheme(self.app.environment))
    }

    /// The release feed base URL in effect (explicit or from the profile).
    pub fn feed_url(&self) -> &str {
        self.updates
            .feed_url
            .as_deref()
            .unwrap_or_else(|| profile::default_feed_url(self.app.environment))
    }

    /// Whether content loads from the dev server instead of packaged files.
    pub fn uses_dev_server(&self) -> bool {
        self.app.environment.is_development() && self.content.dev_server_url.is_some()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_production() {
        let config = RoomdeskConfig::default();
        assert_eq!(config.app.environment, Environment::Production);
        assert!(config.app.packaged);
        assert_eq!(config.scheme(), "trtcroom");
        assert_eq!(config.feed_url(), "https://update.example.com");
    }

    #[test]
    fn default_updates_schedule() {
        let config = RoomdeskConfig::default();
        assert!(config.updates.enabled);
        assert_eq!(config.updates.channel, "latest");
        assert!(!config.updates.allow_prerelease);
        assert_eq!(config.updates.startup_delay_secs, 3);
        assert_eq!(config.updates.check_interval_secs, 3600);
    }

    #[test]
    fn default_window_sizes() {
        let windows = WindowsConfig::default();
        assert_eq!((windows.main_min_width, windows.main_min_height), (1200, 640));
        assert_eq!(
            (windows.whiteboard_width, windows.whiteboard_height),
            (1280, 720)
        );
        assert_eq!(windows.display_tolerance_px, 100);
    }

    #[test]
    fn explicit_scheme_wins_over_profile() {
        let mut config = RoomdeskConfig::default();
        config.app.environment = Environment::Staging;
        assert_eq!(config.scheme(), "trtcroom-staging");

        config.protocol.scheme = Some("custom".into());
        assert_eq!(config.scheme(), "custom");
    }

    #[test]
    fn dev_server_only_used_in_development_profiles() {
        let mut config = RoomdeskConfig::default();
        config.content.dev_server_url = Some("http://127.0.0.1:5173".into());
        assert!(!config.uses_dev_server());

        config.app.environment = Environment::Mock;
        assert!(config.uses_dev_server());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RoomdeskConfig = toml::from_str(
            r#"
[updates]
channel = "beta"
"#,
        )
        .unwrap();
        assert_eq!(config.updates.channel, "beta");
        assert_eq!(config.updates.check_interval_secs, 3600);
        assert_eq!(config.windows.main_min_width, 1200);
    }
}
