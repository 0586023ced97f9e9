#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use roomdesk_app::Coordinator;
use roomdesk_common::events::HostEvent;
use roomdesk_common::types::{Display, Rect, WindowHandle};
use roomdesk_config::RoomdeskConfig;
use roomdesk_protocol::NoopRegistrar;
use roomdesk_updater::testing::{RecordingInstaller, ScriptedFeed};
use roomdesk_updater::{Completion, UpdateController, UpdateFile, UpdateManifest, UpdaterSettings};
use roomdesk_windows::testing::RecordingHost;
use tokio::sync::mpsc;

/// Handles the recording host hands out after `ready`, in creation order.
pub const MAIN: WindowHandle = WindowHandle(1);
pub const WHITEBOARD: WindowHandle = WindowHandle(2);
pub const ANNOTATION: WindowHandle = WindowHandle(3);

pub fn coordinator(config: &RoomdeskConfig) -> (Coordinator, RecordingHost) {
    let host = RecordingHost::new();
    let coordinator = Coordinator::new(
        config,
        Box::new(host.clone()),
        Box::new(NoopRegistrar),
        None,
    );
    (coordinator, host)
}

/// A coordinator after `ready`, with all three windows created.
pub fn started() -> (Coordinator, RecordingHost) {
    let (mut c, host) = coordinator(&RoomdeskConfig::default());
    c.handle_event(ready());
    (c, host)
}

pub struct UpdateRig {
    pub coordinator: Coordinator,
    pub host: RecordingHost,
    pub feed: ScriptedFeed,
    pub installer: RecordingInstaller,
    pub completions: mpsc::UnboundedReceiver<Completion>,
}

impl UpdateRig {
    pub fn new(installer: RecordingInstaller) -> Self {
        let host = RecordingHost::new();
        let feed = ScriptedFeed::new();
        let (controller, completions) = UpdateController::with_pending_dir(
            updater_settings(),
            Arc::new(feed.clone()),
            Box::new(installer.clone()),
            PathBuf::from("/tmp/roomdesk-it/pending"),
        );
        let coordinator = Coordinator::new(
            &RoomdeskConfig::default(),
            Box::new(host.clone()),
            Box::new(NoopRegistrar),
            Some(controller),
        );
        Self {
            coordinator,
            host,
            feed,
            installer,
            completions,
        }
    }

    /// Feed the next background completion to the coordinator.
    pub async fn pump(&mut self) -> roomdesk_app::Flow {
        let completion = self
            .completions
            .recv()
            .await
            .expect("completion channel closed");
        self.coordinator.handle_update_completion(completion)
    }
}

pub fn updater_settings() -> UpdaterSettings {
    UpdaterSettings {
        feed_url: "https://update.example.com".into(),
        channel: "latest".into(),
        allow_prerelease: false,
        platform: "linux".into(),
        cache_dir_name: "roomdesk-updater-cache".into(),
        current_version: "1.0.0".into(),
        startup_delay: Duration::from_secs(3),
        check_interval: Duration::from_secs(3600),
    }
}

pub fn manifest(version: &str) -> UpdateManifest {
    UpdateManifest {
        version: version.into(),
        files: vec![UpdateFile {
            url: format!("https://update.example.com/Roomdesk-{version}.AppImage"),
            sha512: "c2hh".into(),
            size: 1024,
        }],
        release_date: None,
        release_notes: Some("Bug fixes".into()),
    }
}

pub fn ready() -> HostEvent {
    HostEvent::Ready {
        displays: Vec::new(),
        primary_display: None,
        screen_access: false,
    }
}

pub fn ipc(window: WindowHandle, topic: &str) -> HostEvent {
    ipc_with(window, topic, serde_json::Value::Null)
}

pub fn ipc_with(window: WindowHandle, topic: &str, payload: serde_json::Value) -> HostEvent {
    HostEvent::Ipc {
        window,
        topic: topic.into(),
        payload,
    }
}

pub fn display(id: u32, work_area: Rect, scale_factor: f64, primary: bool) -> Display {
    Display {
        id,
        bounds: Rect::new(work_area.x, 0, work_area.width, work_area.height + 40),
        work_area,
        scale_factor,
        primary,
    }
}

/// Captures what the coordinator writes to the host.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn commands(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    pub fn command_names(&self) -> Vec<String> {
        self.commands()
            .iter()
            .map(|c| c["cmd"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
