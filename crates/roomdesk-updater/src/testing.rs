//! Scriptable feed and installer doubles. Clones share state.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::controller::Installer;
use crate::error::UpdateError;
use crate::feed::{DownloadedUpdate, FeedSource, ProgressFn};
use crate::machine::DownloadProgress;
use crate::manifest::UpdateManifest;

#[derive(Debug, Default)]
struct Script {
    manifests: VecDeque<Result<UpdateManifest, String>>,
    downloads: VecDeque<Result<(), String>>,
    progress: Vec<DownloadProgress>,
    hold_fetches: bool,
    hold_downloads: bool,
    fetch_calls: usize,
    download_calls: usize,
}

/// A [`FeedSource`] that replays queued results.
///
/// Fetches and downloads can be held until released, to keep the controller
/// in `Checking` or `Downloading`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFeed {
    script: Arc<Mutex<Script>>,
    fetch_gate: Arc<Notify>,
    download_gate: Arc<Notify>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue the next fetch result; `Err` becomes a network error.
    pub fn push_manifest(&self, result: Result<UpdateManifest, String>) {
        self.lock().manifests.push_back(result);
    }

    /// Progress reported by every download before it finishes.
    pub fn push_progress(&self, progress: DownloadProgress) {
        self.lock().progress.push(progress);
    }

    /// Queue the next download result; an empty queue succeeds.
    pub fn push_download(&self, result: Result<(), String>) {
        self.lock().downloads.push_back(result);
    }

    pub fn hold_fetches(&self) {
        self.lock().hold_fetches = true;
    }

    pub fn hold_downloads(&self) {
        self.lock().hold_downloads = true;
    }

    /// Let one held fetch complete.
    pub fn release_fetch(&self) {
        self.fetch_gate.notify_one();
    }

    /// Let one held download complete.
    pub fn release_download(&self) {
        self.download_gate.notify_one();
    }

    pub fn fetch_calls(&self) -> usize {
        self.lock().fetch_calls
    }

    pub fn download_calls(&self) -> usize {
        self.lock().download_calls
    }
}

#[async_trait]
impl FeedSource for ScriptedFeed {
    async fn fetch_manifest(&self) -> Result<UpdateManifest, UpdateError> {
        let hold = {
            let mut script = self.lock();
            script.fetch_calls += 1;
            script.hold_fetches
        };
        if hold {
            self.fetch_gate.notified().await;
        }
        let next = self.lock().manifests.pop_front();
        match next {
            Some(Ok(manifest)) => Ok(manifest),
            Some(Err(message)) => Err(UpdateError::Network(message)),
            None => Err(UpdateError::Network("no scripted manifest".into())),
        }
    }

    async fn download(
        &self,
        manifest: &UpdateManifest,
        dest_dir: &Path,
        on_progress: ProgressFn,
    ) -> Result<DownloadedUpdate, UpdateError> {
        let (hold, progress) = {
            let mut script = self.lock();
            script.download_calls += 1;
            (script.hold_downloads, script.progress.clone())
        };
        if hold {
            self.download_gate.notified().await;
        }
        for p in progress {
            on_progress(p);
        }
        let next = self.lock().downloads.pop_front();
        match next {
            Some(Err(message)) => Err(UpdateError::Integrity(message)),
            Some(Ok(())) | None => {
                let name = manifest
                    .primary_file()
                    .and_then(|f| f.url.rsplit('/').next())
                    .unwrap_or("update.bin");
                Ok(DownloadedUpdate {
                    version: manifest.version.clone(),
                    path: dest_dir.join(name),
                })
            }
        }
    }
}

/// Records installs instead of launching anything.
#[derive(Debug, Clone, Default)]
pub struct RecordingInstaller {
    installed: Arc<Mutex<Vec<DownloadedUpdate>>>,
    fail: bool,
}

impl RecordingInstaller {
    /// An installer whose every install fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn installed(&self) -> Vec<DownloadedUpdate> {
        self.installed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Installer for RecordingInstaller {
    fn install(&self, update: &DownloadedUpdate) -> Result<(), UpdateError> {
        if self.fail {
            return Err(UpdateError::Install(format!(
                "cannot launch {}",
                update.path.display()
            )));
        }
        self.installed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(update.clone());
        Ok(())
    }
}
