//! The update state machine.
//!
//! ```text
//! Idle       --check-now------------> Checking
//! Checking   --feed: newer----------> Available --(auto)--> Downloading
//! Checking   --feed: same-----------> Idle
//! Checking   --feed: error----------> Error
//! Downloading --progress------------> Downloading
//! Downloading --complete------------> Downloaded
//! Downloading --error---------------> Error
//! Downloaded --quit-and-install-----> Installing
//! Installing --install error--------> Error
//! Error      --check-now------------> Checking
//! ```
//!
//! Every other input is stale and ignored. [`UpdateMachine::apply`] performs
//! no I/O; it returns the [`Effect`]s the caller must run.

use std::collections::VecDeque;

use roomdesk_ipc::topics;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::manifest::UpdateManifest;

const HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadProgress {
    pub percent: f64,
    pub transferred: u64,
    pub total: u64,
    pub bytes_per_second: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateState {
    Idle,
    Checking,
    Available(UpdateManifest),
    Downloading(DownloadProgress),
    Downloaded,
    /// Terminal: the installer has been launched and the process should exit.
    Installing,
    Error(String),
}

impl UpdateState {
    pub fn name(&self) -> &'static str {
        match self {
            UpdateState::Idle => "idle",
            UpdateState::Checking => "checking",
            UpdateState::Available(_) => "available",
            UpdateState::Downloading(_) => "downloading",
            UpdateState::Downloaded => "downloaded",
            UpdateState::Installing => "installing",
            UpdateState::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateInput {
    CheckNow,
    /// `Some` when the feed offers a newer version, `None` when current.
    FeedReturned(Result<Option<UpdateManifest>, String>),
    Progress(DownloadProgress),
    DownloadFinished(Result<(), String>),
    QuitAndInstall,
    InstallFailed(String),
}

/// What content is told after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateNotice {
    Available(UpdateManifest),
    NotAvailable,
    Progress(DownloadProgress),
    Downloaded,
    Error(String),
}

impl UpdateNotice {
    pub fn topic(&self) -> &'static str {
        match self {
            UpdateNotice::Available(_) => topics::UPDATE_AVAILABLE,
            UpdateNotice::NotAvailable => topics::UPDATE_NOT_AVAILABLE,
            UpdateNotice::Progress(_) => topics::DOWNLOAD_PROGRESS,
            UpdateNotice::Downloaded => topics::UPDATE_DOWNLOADED,
            UpdateNotice::Error(_) => topics::UPDATE_ERROR,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            UpdateNotice::Available(manifest) => {
                serde_json::to_value(manifest).unwrap_or(Value::Null)
            }
            UpdateNotice::Progress(progress) => {
                serde_json::to_value(progress).unwrap_or(Value::Null)
            }
            UpdateNotice::Error(message) => Value::String(message.clone()),
            UpdateNotice::NotAvailable | UpdateNotice::Downloaded => Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchFeed,
    StartDownload(UpdateManifest),
    Notify(UpdateNotice),
    Install,
}

#[derive(Debug)]
pub struct UpdateMachine {
    state: UpdateState,
    history: VecDeque<&'static str>,
}

impl Default for UpdateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateMachine {
    pub fn new() -> Self {
        let mut history = VecDeque::with_capacity(HISTORY_LIMIT);
        history.push_back(UpdateState::Idle.name());
        Self {
            state: UpdateState::Idle,
            history,
        }
    }

    pub fn state(&self) -> &UpdateState {
        &self.state
    }

    /// Names of the most recent states, oldest first, starting with `idle`
    /// until the history wraps.
    pub fn history(&self) -> Vec<&'static str> {
        self.history.iter().copied().collect()
    }

    pub fn apply(&mut self, input: UpdateInput) -> Vec<Effect> {
        let mut effects = Vec::new();
        match (&self.state, input) {
            (UpdateState::Idle | UpdateState::Error(_), UpdateInput::CheckNow) => {
                self.enter(UpdateState::Checking);
                effects.push(Effect::FetchFeed);
            }
            (UpdateState::Checking, UpdateInput::FeedReturned(Ok(Some(manifest)))) => {
                info!(version = %manifest.version, "Update available");
                self.enter(UpdateState::Available(manifest.clone()));
                effects.push(Effect::Notify(UpdateNotice::Available(manifest.clone())));
                // Downloads start as soon as an update is known.
                self.enter(UpdateState::Downloading(DownloadProgress::default()));
                effects.push(Effect::StartDownload(manifest));
            }
            (UpdateState::Checking, UpdateInput::FeedReturned(Ok(None))) => {
                info!("Update not available");
                self.enter(UpdateState::Idle);
                effects.push(Effect::Notify(UpdateNotice::NotAvailable));
            }
            (UpdateState::Checking, UpdateInput::FeedReturned(Err(reason)))
            | (UpdateState::Downloading(_), UpdateInput::DownloadFinished(Err(reason)))
            | (UpdateState::Installing, UpdateInput::InstallFailed(reason)) => {
                self.enter(UpdateState::Error(reason.clone()));
                effects.push(Effect::Notify(UpdateNotice::Error(reason)));
            }
            (UpdateState::Downloading(_), UpdateInput::Progress(progress)) => {
                // Progress updates stay in the same state; not recorded in history.
                self.state = UpdateState::Downloading(progress);
                effects.push(Effect::Notify(UpdateNotice::Progress(progress)));
            }
            (UpdateState::Downloading(_), UpdateInput::DownloadFinished(Ok(()))) => {
                info!("Update downloaded");
                self.enter(UpdateState::Downloaded);
                effects.push(Effect::Notify(UpdateNotice::Downloaded));
            }
            (UpdateState::Downloaded, UpdateInput::QuitAndInstall) => {
                self.enter(UpdateState::Installing);
                effects.push(Effect::Install);
            }
            (state, input) => {
                debug!(state = state.name(), ?input, "Ignoring stale update input");
            }
        }
        effects
    }

    fn enter(&mut self, next: UpdateState) {
        debug!(from = self.state.name(), to = next.name(), "Update state transition");
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(next.name());
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::UpdateFile;
    use serde_json::json;

    fn manifest() -> UpdateManifest {
        UpdateManifest {
            version: "2.0.0".into(),
            files: vec![UpdateFile {
                url: "http://x/app.zip".into(),
                sha512: "abc".into(),
                size: 100,
            }],
            release_date: None,
            release_notes: None,
        }
    }

    fn progress(percent: f64) -> DownloadProgress {
        DownloadProgress {
            percent,
            transferred: percent as u64,
            total: 100,
            bytes_per_second: 10,
        }
    }

    fn notices(effects: &[Effect]) -> Vec<&'static str> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Notify(n) => Some(n.topic()),
                _ => None,
            })
            .collect()
    }

    fn downloading() -> UpdateMachine {
        let mut m = UpdateMachine::new();
        m.apply(UpdateInput::CheckNow);
        m.apply(UpdateInput::FeedReturned(Ok(Some(manifest()))));
        m
    }

    #[test]
    fn idle_check_now_fetches() {
        let mut m = UpdateMachine::new();
        assert_eq!(m.apply(UpdateInput::CheckNow), vec![Effect::FetchFeed]);
        assert_eq!(m.state(), &UpdateState::Checking);
    }

    #[test]
    fn check_now_while_checking_is_ignored() {
        let mut m = UpdateMachine::new();
        m.apply(UpdateInput::CheckNow);
        assert!(m.apply(UpdateInput::CheckNow).is_empty());
        assert_eq!(m.state(), &UpdateState::Checking);
    }

    #[test]
    fn newer_feed_notifies_then_downloads() {
        let mut m = UpdateMachine::new();
        m.apply(UpdateInput::CheckNow);
        let effects = m.apply(UpdateInput::FeedReturned(Ok(Some(manifest()))));
        assert_eq!(
            effects,
            vec![
                Effect::Notify(UpdateNotice::Available(manifest())),
                Effect::StartDownload(manifest()),
            ]
        );
        assert_eq!(m.history(), vec!["idle", "checking", "available", "downloading"]);
    }

    #[test]
    fn same_version_returns_to_idle() {
        let mut m = UpdateMachine::new();
        m.apply(UpdateInput::CheckNow);
        let effects = m.apply(UpdateInput::FeedReturned(Ok(None)));
        assert_eq!(notices(&effects), vec![topics::UPDATE_NOT_AVAILABLE]);
        assert_eq!(m.state(), &UpdateState::Idle);
    }

    #[test]
    fn feed_error_then_check_now_recovers() {
        let mut m = UpdateMachine::new();
        m.apply(UpdateInput::CheckNow);
        let effects = m.apply(UpdateInput::FeedReturned(Err("offline".into())));
        assert_eq!(
            effects,
            vec![Effect::Notify(UpdateNotice::Error("offline".into()))]
        );
        assert_eq!(m.state(), &UpdateState::Error("offline".into()));

        assert_eq!(m.apply(UpdateInput::CheckNow), vec![Effect::FetchFeed]);
        assert_eq!(m.history(), vec!["idle", "checking", "error", "checking"]);
    }

    #[test]
    fn progress_repeats_in_downloading() {
        let mut m = downloading();
        for pct in [10.0, 50.0, 90.0] {
            let effects = m.apply(UpdateInput::Progress(progress(pct)));
            assert_eq!(effects, vec![Effect::Notify(UpdateNotice::Progress(progress(pct)))]);
        }
        assert_eq!(m.state(), &UpdateState::Downloading(progress(90.0)));
        assert_eq!(m.history().last(), Some(&"downloading"));
    }

    #[test]
    fn download_complete_then_install() {
        let mut m = downloading();
        let effects = m.apply(UpdateInput::DownloadFinished(Ok(())));
        assert_eq!(notices(&effects), vec![topics::UPDATE_DOWNLOADED]);
        assert_eq!(m.state(), &UpdateState::Downloaded);

        assert_eq!(m.apply(UpdateInput::QuitAndInstall), vec![Effect::Install]);
        assert_eq!(m.state(), &UpdateState::Installing);
        assert!(m.apply(UpdateInput::QuitAndInstall).is_empty());
    }

    #[test]
    fn download_error_then_check_now_recovers() {
        let mut m = downloading();
        let effects = m.apply(UpdateInput::DownloadFinished(Err("sha512 mismatch".into())));
        assert_eq!(notices(&effects), vec![topics::UPDATE_ERROR]);
        assert!(matches!(m.state(), UpdateState::Error(_)));
        assert_eq!(m.apply(UpdateInput::CheckNow), vec![Effect::FetchFeed]);
    }

    #[test]
    fn install_failure_is_an_error() {
        let mut m = downloading();
        m.apply(UpdateInput::DownloadFinished(Ok(())));
        m.apply(UpdateInput::QuitAndInstall);
        let effects = m.apply(UpdateInput::InstallFailed("no such file".into()));
        assert_eq!(notices(&effects), vec![topics::UPDATE_ERROR]);
        assert!(matches!(m.state(), UpdateState::Error(_)));
    }

    #[test]
    fn quit_and_install_outside_downloaded_is_noop() {
        let mut m = UpdateMachine::new();
        assert!(m.apply(UpdateInput::QuitAndInstall).is_empty());
        m.apply(UpdateInput::CheckNow);
        assert!(m.apply(UpdateInput::QuitAndInstall).is_empty());
        let mut m = downloading();
        assert!(m.apply(UpdateInput::QuitAndInstall).is_empty());
        assert!(matches!(m.state(), UpdateState::Downloading(_)));
    }

    #[test]
    fn stale_inputs_are_ignored() {
        let mut m = UpdateMachine::new();
        assert!(m.apply(UpdateInput::FeedReturned(Ok(None))).is_empty());
        assert!(m.apply(UpdateInput::Progress(progress(5.0))).is_empty());
        assert!(m.apply(UpdateInput::DownloadFinished(Ok(()))).is_empty());
        assert_eq!(m.state(), &UpdateState::Idle);

        // No new check while a download runs or after it finished.
        let mut m = downloading();
        assert!(m.apply(UpdateInput::CheckNow).is_empty());
        m.apply(UpdateInput::DownloadFinished(Ok(())));
        assert!(m.apply(UpdateInput::CheckNow).is_empty());
        assert_eq!(m.state(), &UpdateState::Downloaded);
    }

    #[test]
    fn history_is_bounded() {
        let mut m = UpdateMachine::new();
        for _ in 0..100 {
            m.apply(UpdateInput::CheckNow);
            m.apply(UpdateInput::FeedReturned(Ok(None)));
        }
        assert_eq!(m.history().len(), HISTORY_LIMIT);
        assert_eq!(m.history().last(), Some(&"idle"));
    }

    #[test]
    fn notice_payloads() {
        assert_eq!(
            UpdateNotice::Progress(progress(50.0)).payload(),
            json!({"percent": 50.0, "transferred": 50, "total": 100, "bytesPerSecond": 10})
        );
        assert_eq!(UpdateNotice::Error("boom".into()).payload(), json!("boom"));
        assert_eq!(UpdateNotice::Downloaded.payload(), Value::Null);
        assert_eq!(
            UpdateNotice::Available(manifest()).payload()["version"],
            json!("2.0.0")
        );
    }
}
