//! Drives [`UpdateMachine`] against a real feed.
//!
//! Effects that do I/O run as spawned tasks and report back through an
//! unbounded channel of [`Completion`]s. The owner of the event loop feeds
//! each completion to [`UpdateController::handle_completion`], so all state
//! changes happen on the loop's turn. Notices pile up until the owner drains
//! them and forwards them to the main window.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::error::UpdateError;
use crate::feed::{DownloadedUpdate, FeedSource};
use crate::machine::{DownloadProgress, Effect, UpdateInput, UpdateMachine, UpdateNotice, UpdateState};
use crate::manifest::UpdateManifest;
use crate::settings::UpdaterSettings;
use crate::version;

/// Hands a downloaded update to the OS installer.
pub trait Installer {
    fn install(&self, update: &DownloadedUpdate) -> Result<(), UpdateError>;
}

/// Result of a background update task.
#[derive(Debug)]
pub enum Completion {
    Feed(Result<UpdateManifest, UpdateError>),
    Progress(DownloadProgress),
    Download(Result<DownloadedUpdate, UpdateError>),
}

pub struct UpdateController {
    machine: UpdateMachine,
    settings: UpdaterSettings,
    feed: Arc<dyn FeedSource>,
    installer: Box<dyn Installer>,
    pending_dir: PathBuf,
    completions: mpsc::UnboundedSender<Completion>,
    notices: Vec<UpdateNotice>,
    downloaded: Option<DownloadedUpdate>,
    fetches_started: usize,
    exit_requested: bool,
}

impl UpdateController {
    pub fn new(
        settings: UpdaterSettings,
        feed: Arc<dyn FeedSource>,
        installer: Box<dyn Installer>,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let pending_dir = settings.pending_dir();
        Self::with_pending_dir(settings, feed, installer, pending_dir)
    }

    pub fn with_pending_dir(
        settings: UpdaterSettings,
        feed: Arc<dyn FeedSource>,
        installer: Box<dyn Installer>,
        pending_dir: PathBuf,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            machine: UpdateMachine::new(),
            settings,
            feed,
            installer,
            pending_dir,
            completions: tx,
            notices: Vec::new(),
            downloaded: None,
            fetches_started: 0,
            exit_requested: false,
        };
        (controller, rx)
    }

    pub fn state(&self) -> &UpdateState {
        self.machine.state()
    }

    pub fn history(&self) -> Vec<&'static str> {
        self.machine.history()
    }

    /// How many feed fetches this controller has started.
    pub fn fetches_started(&self) -> usize {
        self.fetches_started
    }

    /// Set once an installer has been launched; the process should exit.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Start a check. While one is in flight this is a no-op.
    pub fn check_now(&mut self) {
        self.apply(UpdateInput::CheckNow);
    }

    /// Install the downloaded update. A no-op unless one is downloaded.
    pub fn quit_and_install(&mut self) {
        self.apply(UpdateInput::QuitAndInstall);
    }

    pub fn handle_completion(&mut self, completion: Completion) {
        let input = match completion {
            Completion::Feed(Ok(manifest)) => {
                match version::is_newer(
                    &manifest.version,
                    &self.settings.current_version,
                    self.settings.allow_prerelease,
                ) {
                    Ok(true) => UpdateInput::FeedReturned(Ok(Some(manifest))),
                    Ok(false) => UpdateInput::FeedReturned(Ok(None)),
                    Err(e) => UpdateInput::FeedReturned(Err(e.to_string())),
                }
            }
            Completion::Feed(Err(e)) => {
                error!(error = %e, "Update check failed");
                UpdateInput::FeedReturned(Err(e.to_string()))
            }
            Completion::Progress(progress) => UpdateInput::Progress(progress),
            Completion::Download(Ok(update)) => {
                info!(version = %update.version, path = %update.path.display(), "Update ready to install");
                self.downloaded = Some(update);
                UpdateInput::DownloadFinished(Ok(()))
            }
            Completion::Download(Err(e)) => {
                error!(error = %e, "Update download failed");
                UpdateInput::DownloadFinished(Err(e.to_string()))
            }
        };
        self.apply(input);
    }

    /// Take the notices produced since the last drain, in order.
    pub fn drain_notices(&mut self) -> Vec<UpdateNotice> {
        std::mem::take(&mut self.notices)
    }

    fn apply(&mut self, input: UpdateInput) {
        for effect in self.machine.apply(input) {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::FetchFeed => {
                self.fetches_started += 1;
                let feed = Arc::clone(&self.feed);
                let tx = self.completions.clone();
                tokio::spawn(async move {
                    let result = feed.fetch_manifest().await;
                    let _ = tx.send(Completion::Feed(result));
                });
            }
            Effect::StartDownload(manifest) => {
                let feed = Arc::clone(&self.feed);
                let tx = self.completions.clone();
                let dest = self.pending_dir.clone();
                tokio::spawn(async move {
                    let progress_tx = tx.clone();
                    let on_progress = Box::new(move |p: DownloadProgress| {
                        let _ = progress_tx.send(Completion::Progress(p));
                    });
                    let result = feed.download(&manifest, &dest, on_progress).await;
                    let _ = tx.send(Completion::Download(result));
                });
            }
            Effect::Notify(notice) => self.notices.push(notice),
            Effect::Install => self.install(),
        }
    }

    fn install(&mut self) {
        let result = match &self.downloaded {
            Some(update) => self.installer.install(update),
            None => Err(UpdateError::Install("no downloaded update".into())),
        };
        match result {
            Ok(()) => {
                info!("Installer launched; exiting");
                self.exit_requested = true;
            }
            Err(e) => {
                warn!(error = %e, "Install failed");
                self.apply(UpdateInput::InstallFailed(e.to_string()));
            }
        }
    }
}
