use std::path::Path;
use std::sync::{Arc, Mutex};

use roomdesk_common::errors::PlatformError;
use roomdesk_common::events::HostEvent;
use roomdesk_common::types::{Display, Rect, WindowHandle, WindowRole};
use roomdesk_protocol::SchemeRegistrar;
use roomdesk_windows::{WindowHost, WindowSpec};
use tracing::debug;

use super::{CommandWriter, HostCommand};

/// Last display geometry the host reported. Shared between the event reader,
/// which updates it, and the [`StdioHost`], which answers queries from it.
#[derive(Debug, Clone, Default)]
pub struct DisplayCache {
    inner: Arc<Mutex<Vec<Display>>>,
}

impl DisplayCache {
    pub fn snapshot(&self) -> Vec<Display> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn replace(&self, displays: Vec<Display>) {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = displays;
    }

    /// Pick up display geometry carried by `event`, if any.
    pub fn observe(&self, event: &HostEvent) {
        if let Some(displays) = event.reported_displays() {
            debug!(count = displays.len(), "Display geometry updated");
            self.replace(displays);
        }
    }
}

/// [`WindowHost`] that forwards every operation to the host process.
///
/// Handles are allocated here, so creation never waits for a reply; the
/// host adopts the handle it is given.
pub struct StdioHost {
    writer: CommandWriter,
    displays: DisplayCache,
    next_handle: u64,
}

impl StdioHost {
    pub fn new(writer: CommandWriter, displays: DisplayCache) -> Self {
        Self {
            writer,
            displays,
            next_handle: 0,
        }
    }
}

impl WindowHost for StdioHost {
    fn create_window(&mut self, role: WindowRole, spec: &WindowSpec) -> Result<WindowHandle, PlatformError> {
        self.next_handle += 1;
        let window = WindowHandle(self.next_handle);
        self.writer.send(&HostCommand::Create {
            window,
            role,
            spec: spec.clone(),
        })?;
        Ok(window)
    }

    fn close_window(&mut self, window: WindowHandle) -> Result<(), PlatformError> {
        self.writer.send(&HostCommand::Close { window })
    }

    fn show_window(&mut self, window: WindowHandle) -> Result<(), PlatformError> {
        self.writer.send(&HostCommand::Show { window })
    }

    fn hide_window(&mut self, window: WindowHandle) -> Result<(), PlatformError> {
        self.writer.send(&HostCommand::Hide { window })
    }

    fn minimize_window(&mut self, window: WindowHandle) -> Result<(), PlatformError> {
        self.writer.send(&HostCommand::Minimize { window })
    }

    fn set_bounds(&mut self, window: WindowHandle, bounds: Rect) -> Result<(), PlatformError> {
        self.writer.send(&HostCommand::SetBounds { window, bounds })
    }

    fn set_ignore_mouse_events(&mut self, window: WindowHandle, ignore: bool) -> Result<(), PlatformError> {
        self.writer.send(&HostCommand::SetIgnoreMouse { window, ignore })
    }

    fn post_message(
        &mut self,
        window: WindowHandle,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PlatformError> {
        self.writer.send(&HostCommand::Post {
            window,
            topic: topic.to_string(),
            payload: payload.clone(),
        })
    }

    fn displays(&self) -> Vec<Display> {
        self.displays.snapshot()
    }
}

/// Asks the host to register the URL scheme with the OS.
pub struct HostRegistrar {
    writer: CommandWriter,
}

impl HostRegistrar {
    pub fn new(writer: CommandWriter) -> Self {
        Self { writer }
    }
}

impl SchemeRegistrar for HostRegistrar {
    fn register(&self, scheme: &str, executable: &Path, args: &[String]) -> Result<(), PlatformError> {
        self.writer.send(&HostCommand::RegisterScheme {
            scheme: scheme.to_string(),
            executable: executable.to_path_buf(),
            args: args.to_vec(),
        })
    }
}
