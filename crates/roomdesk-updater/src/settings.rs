use std::path::PathBuf;
use std::time::Duration;

/// Fixed for the controller's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdaterSettings {
    pub feed_url: String,
    pub channel: String,
    pub allow_prerelease: bool,
    /// `windows`, `macos`, `linux` (also accepts `win32` / `darwin`).
    pub platform: String,
    pub cache_dir_name: String,
    pub current_version: String,
    pub startup_delay: Duration,
    pub check_interval: Duration,
}

impl UpdaterSettings {
    /// The feed document for this channel and platform.
    pub fn feed_document(&self) -> String {
        match self.platform.as_str() {
            "windows" | "win32" => format!("{}.json", self.channel),
            "macos" | "darwin" => format!("{}-mac.json", self.channel),
            "linux" => format!("{}-linux.json", self.channel),
            other => format!("{}-{other}.json", self.channel),
        }
    }

    pub fn manifest_url(&self) -> String {
        format!("{}/{}", self.feed_url.trim_end_matches('/'), self.feed_document())
    }

    /// Resolve a manifest file URL against the feed.
    pub fn resolve_file_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!(
                "{}/{}",
                self.feed_url.trim_end_matches('/'),
                url.trim_start_matches('/')
            )
        }
    }

    /// `<cache dir>/<cache_dir_name>/pending`.
    pub fn pending_dir(&self) -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(&self.cache_dir_name)
            .join("pending")
    }
}

#[cfg(test)]
pub(crate) fn sample() -> UpdaterSettings {
    UpdaterSettings {
        feed_url: "https://update.example.com/".into(),
        channel: "latest".into(),
        allow_prerelease: false,
        platform: "linux".into(),
        cache_dir_name: "roomdesk-updater-cache".into(),
        current_version: "1.0.0".into(),
        startup_delay: Duration::from_secs(3),
        check_interval: Duration::from_secs(3600),
    }
}
