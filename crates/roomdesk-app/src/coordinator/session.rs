use roomdesk_common::types::WindowRole;
use roomdesk_ipc::send;
use roomdesk_protocol::PendingDeepLink;
use roomdesk_updater::UpdateController;
use roomdesk_windows::WindowRegistry;
use serde_json::Value;

use super::content::WindowLayout;

/// State shared with IPC handlers.
pub struct Session {
    pub(crate) windows: WindowRegistry,
    pub(crate) updater: Option<UpdateController>,
    pub(crate) layout: WindowLayout,
    pub(crate) pending_link: Option<PendingDeepLink>,
    pub(crate) main_ready: bool,
    pub(crate) screen_access: bool,
}

impl Session {
    pub(crate) fn new(
        windows: WindowRegistry,
        updater: Option<UpdateController>,
        layout: WindowLayout,
    ) -> Self {
        Self {
            windows,
            updater,
            layout,
            pending_link: None,
            main_ready: false,
            screen_access: false,
        }
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    /// Whether main's content has signalled ready since main was created.
    pub fn is_main_ready(&self) -> bool {
        self.main_ready
    }

    pub(crate) fn send(&mut self, role: WindowRole, topic: &str, payload: Value) -> bool {
        send(&mut self.windows, role, topic, payload)
    }

    pub(crate) fn notify(&mut self, role: WindowRole, topic: &str) -> bool {
        self.send(role, topic, Value::Null)
    }

    /// Push pending update notices to main's content.
    pub(crate) fn flush_update_notices(&mut self) {
        let Some(updater) = self.updater.as_mut() else {
            return;
        };
        for notice in updater.drain_notices() {
            send(&mut self.windows, WindowRole::Main, notice.topic(), notice.payload());
        }
    }

    pub(crate) fn update_exit_requested(&self) -> bool {
        self.updater
            .as_ref()
            .is_some_and(UpdateController::exit_requested)
    }
}
