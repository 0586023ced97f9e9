use roomdesk_common::errors::PlatformError;
use roomdesk_common::types::{Display, Rect, WindowHandle, WindowRole};

use crate::spec::WindowSpec;

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Platform-agnostic capability interface over the windowing host.
///
/// Host-originated notifications (close requests, closures, content
/// messages) arrive separately as [`roomdesk_common::HostEvent`]s and are
/// fed to the registry by the coordinator.
pub trait WindowHost {
    fn create_window(&mut self, role: WindowRole, spec: &WindowSpec) -> Result<WindowHandle>;
    fn close_window(&mut self, window: WindowHandle) -> Result<()>;
    fn show_window(&mut self, window: WindowHandle) -> Result<()>;
    fn hide_window(&mut self, window: WindowHandle) -> Result<()>;
    fn minimize_window(&mut self, window: WindowHandle) -> Result<()>;
    fn set_bounds(&mut self, window: WindowHandle, bounds: Rect) -> Result<()>;
    fn set_ignore_mouse_events(&mut self, window: WindowHandle, ignore: bool) -> Result<()>;
    /// Deliver a one-way message to the window's content.
    fn post_message(
        &mut self,
        window: WindowHandle,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<()>;
    /// Current display geometry. Empty when the host has no display.
    fn displays(&self) -> Vec<Display>;
}
