//! The window registry: the only owner of host window handles.
//!
//! Per-role lifecycle: `Absent -> Created -> (Hidden <-> Visible) -> Absent`.
//! Satellites (whiteboard, annotation) exist only while the main window
//! does. Destroying main destroys both satellites first, within the same
//! call, so no observer sees main absent while a satellite lives.

use std::collections::BTreeMap;

use roomdesk_common::errors::WindowError;
use roomdesk_common::types::{Display, Rect, WindowHandle, WindowRole};
use tracing::{debug, info, warn};

use crate::host::WindowHost;
use crate::spec::WindowSpec;

/// Observable state of a live window. Absence is represented by the role
/// having no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Created and never explicitly shown or hidden.
    Created,
    Hidden,
    Visible,
}

/// Result of a host close request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The listed roles were destroyed, satellites before main.
    Destroyed(Vec<WindowRole>),
    /// The native close was suppressed; the window stays alive.
    Intercepted,
    /// The role had no live window.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    handle: WindowHandle,
    state: WindowState,
}

pub struct WindowRegistry {
    host: Box<dyn WindowHost>,
    entries: BTreeMap<WindowRole, Entry>,
}

impl WindowRegistry {
    pub fn new(host: Box<dyn WindowHost>) -> Self {
        Self {
            host,
            entries: BTreeMap::new(),
        }
    }

    /// Create the window for `role`.
    ///
    /// Fails if the role already has a live window (callers must
    /// [`destroy`](Self::destroy) first) or if a satellite is requested
    /// while main is absent.
    pub fn create(&mut self, role: WindowRole, spec: &WindowSpec) -> Result<WindowHandle, WindowError> {
        if self.entries.contains_key(&role) {
            return Err(WindowError::AlreadyExists(role));
        }
        if role.is_satellite() && !self.is_alive(WindowRole::Main) {
            return Err(WindowError::MainRequired(role));
        }

        let handle = self
            .host
            .create_window(role, spec)
            .map_err(|e| WindowError::HostRefused {
                role,
                reason: e.to_string(),
            })?;

        let state = if spec.show {
            WindowState::Visible
        } else {
            WindowState::Created
        };
        self.entries.insert(role, Entry { handle, state });
        info!(%role, %handle, "window created");
        Ok(handle)
    }

    pub fn get(&self, role: WindowRole) -> Option<WindowHandle> {
        self.entries.get(&role).map(|e| e.handle)
    }

    pub fn state(&self, role: WindowRole) -> Option<WindowState> {
        self.entries.get(&role).map(|e| e.state)
    }

    pub fn is_alive(&self, role: WindowRole) -> bool {
        self.entries.contains_key(&role)
    }

    /// Reverse lookup for host events that carry a handle.
    pub fn role_of(&self, handle: WindowHandle) -> Option<WindowRole> {
        self.entries
            .iter()
            .find(|(_, e)| e.handle == handle)
            .map(|(role, _)| *role)
    }

    /// Destroy the window for `role`, returning every role that was removed.
    ///
    /// Destroying main cascades to both satellites first. Entries are
    /// cleared even if the host reports a close failure so the cascade
    /// invariant holds.
    pub fn destroy(&mut self, role: WindowRole) -> Vec<WindowRole> {
        let mut destroyed = Vec::new();
        if !self.entries.contains_key(&role) {
            return destroyed;
        }

        if role == WindowRole::Main {
            for satellite in WindowRole::SATELLITES {
                if self.close_entry(satellite) {
                    destroyed.push(satellite);
                }
            }
        }
        if self.close_entry(role) {
            destroyed.push(role);
        }
        destroyed
    }

    /// Destroy everything, main last.
    pub fn destroy_all(&mut self) -> Vec<WindowRole> {
        let mut destroyed = Vec::new();
        for satellite in WindowRole::SATELLITES {
            destroyed.extend(self.destroy(satellite));
        }
        destroyed.extend(self.destroy(WindowRole::Main));
        destroyed
    }

    fn close_entry(&mut self, role: WindowRole) -> bool {
        let Some(entry) = self.entries.remove(&role) else {
            return false;
        };
        if let Err(e) = self.host.close_window(entry.handle) {
            warn!(%role, handle = %entry.handle, error = %e, "host failed to close window");
        }
        info!(%role, handle = %entry.handle, "window destroyed");
        true
    }

    /// Decide what a native close request for `role` does.
    ///
    /// Main closes (and cascades). A satellite closes only when main is
    /// gone; otherwise the close is swallowed: the whiteboard is hidden and
    /// the annotation overlay is kept alive out of sight.
    pub fn handle_close_requested(&mut self, role: WindowRole) -> CloseOutcome {
        if !self.is_alive(role) {
            return CloseOutcome::Ignored;
        }
        if role == WindowRole::Main || !self.is_alive(WindowRole::Main) {
            return CloseOutcome::Destroyed(self.destroy(role));
        }

        match role {
            WindowRole::Whiteboard => self.hide(role),
            _ => {
                if self.state(role) == Some(WindowState::Visible) {
                    self.hide(role);
                }
            }
        }
        debug!(%role, "close intercepted while main is alive");
        CloseOutcome::Intercepted
    }

    /// The host destroyed a window on its own. Clears the entry; losing
    /// main takes the satellites with it.
    pub fn handle_closed(&mut self, role: WindowRole) -> Vec<WindowRole> {
        let mut removed = Vec::new();
        if role == WindowRole::Main {
            for satellite in WindowRole::SATELLITES {
                if self.close_entry(satellite) {
                    removed.push(satellite);
                }
            }
        }
        if self.entries.remove(&role).is_some() {
            info!(%role, "window closed by host");
            removed.push(role);
        }
        removed
    }

    /// Forget every entry without calling the host (the host already
    /// reported that all windows are gone).
    pub fn clear_all(&mut self) {
        if !self.entries.is_empty() {
            debug!(count = self.entries.len(), "clearing window registry");
        }
        self.entries.clear();
    }

    pub fn show(&mut self, role: WindowRole) {
        if let Some(handle) = self.get(role) {
            match self.host.show_window(handle) {
                Ok(()) => self.set_state(role, WindowState::Visible),
                Err(e) => warn!(%role, error = %e, "show failed"),
            }
        }
    }

    /// Hide never destroys; the handle stays valid.
    pub fn hide(&mut self, role: WindowRole) {
        if let Some(handle) = self.get(role) {
            match self.host.hide_window(handle) {
                Ok(()) => self.set_state(role, WindowState::Hidden),
                Err(e) => warn!(%role, error = %e, "hide failed"),
            }
        }
    }

    pub fn minimize(&mut self, role: WindowRole) {
        if let Some(handle) = self.get(role) {
            if let Err(e) = self.host.minimize_window(handle) {
                warn!(%role, error = %e, "minimize failed");
            }
        }
    }

    pub fn set_bounds(&mut self, role: WindowRole, bounds: Rect) {
        if let Some(handle) = self.get(role) {
            if let Err(e) = self.host.set_bounds(handle, bounds) {
                warn!(%role, error = %e, "set_bounds failed");
            }
        }
    }

    pub fn set_ignore_mouse_events(&mut self, role: WindowRole, ignore: bool) {
        if let Some(handle) = self.get(role) {
            if let Err(e) = self.host.set_ignore_mouse_events(handle, ignore) {
                warn!(%role, error = %e, "set_ignore_mouse_events failed");
            }
        }
    }

    /// Deliver a message to a window's content. Returns `false` when the
    /// role is absent or the host could not deliver.
    pub fn post(&mut self, role: WindowRole, topic: &str, payload: &serde_json::Value) -> bool {
        let Some(handle) = self.get(role) else {
            debug!(%role, topic, "post skipped: window absent");
            return false;
        };
        match self.host.post_message(handle, topic, payload) {
            Ok(()) => true,
            Err(e) => {
                warn!(%role, topic, error = %e, "post failed");
                false
            }
        }
    }

    pub fn displays(&self) -> Vec<Display> {
        self.host.displays()
    }

    /// Roles with a live window, in role order.
    pub fn live_roles(&self) -> Vec<WindowRole> {
        self.entries.keys().copied().collect()
    }

    fn set_state(&mut self, role: WindowRole, state: WindowState) {
        if let Some(entry) = self.entries.get_mut(&role) {
            entry.state = state;
        }
    }
}
