//! A recording [`WindowHost`] for tests. Clones share state, so a test can
//! keep one clone and hand another to the registry.

use std::sync::{Arc, Mutex, MutexGuard};

use roomdesk_common::errors::PlatformError;
use roomdesk_common::types::{Display, Rect, WindowHandle, WindowRole};

use crate::host::{Result, WindowHost};
use crate::spec::WindowSpec;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create(WindowRole, WindowHandle),
    Close(WindowHandle),
    Show(WindowHandle),
    Hide(WindowHandle),
    Minimize(WindowHandle),
    SetBounds(WindowHandle, Rect),
    SetIgnoreMouse(WindowHandle, bool),
    Post(WindowHandle, String, serde_json::Value),
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    calls: Vec<HostCall>,
    specs: Vec<(WindowRole, WindowSpec)>,
    displays: Vec<Display>,
    refuse_creation: bool,
    fail_operations: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingHost {
    /// A host with one 1920x1080 primary display.
    pub fn new() -> Self {
        let host = Self::default();
        host.set_displays(vec![Display {
            id: 1,
            bounds: Rect::new(0, 0, 1920, 1080),
            work_area: Rect::new(0, 0, 1920, 1040),
            scale_factor: 1.0,
            primary: true,
        }]);
        host
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_displays(&self, displays: Vec<Display>) {
        self.lock().displays = displays;
    }

    /// Make every `create_window` fail.
    pub fn refuse_creation(&self, refuse: bool) {
        self.lock().refuse_creation = refuse;
    }

    /// Make every operation other than creation fail.
    pub fn fail_operations(&self, fail: bool) {
        self.lock().fail_operations = fail;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn specs(&self) -> Vec<(WindowRole, WindowSpec)> {
        self.lock().specs.clone()
    }

    pub fn posts(&self) -> Vec<(WindowHandle, String, serde_json::Value)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Post(h, topic, payload) => Some((*h, topic.clone(), payload.clone())),
                _ => None,
            })
            .collect()
    }

    /// Topics posted to one window, in send order.
    pub fn topics_for(&self, window: WindowHandle) -> Vec<String> {
        self.posts()
            .into_iter()
            .filter(|(h, _, _)| *h == window)
            .map(|(_, topic, _)| topic)
            .collect()
    }

    pub fn created_count(&self) -> usize {
        self.count(|c| matches!(c, HostCall::Create(..)))
    }

    pub fn closed_count(&self) -> usize {
        self.count(|c| matches!(c, HostCall::Close(_)))
    }

    fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: HostCall) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(call);
        if inner.fail_operations {
            return Err(PlatformError::HostError("scripted failure".into()));
        }
        Ok(())
    }
}

impl WindowHost for RecordingHost {
    fn create_window(&mut self, role: WindowRole, spec: &WindowSpec) -> Result<WindowHandle> {
        let mut inner = self.lock();
        if inner.refuse_creation {
            return Err(PlatformError::HostError("creation refused".into()));
        }
        inner.next_id += 1;
        let handle = WindowHandle(inner.next_id);
        inner.calls.push(HostCall::Create(role, handle));
        inner.specs.push((role, spec.clone()));
        Ok(handle)
    }

    fn close_window(&mut self, window: WindowHandle) -> Result<()> {
        self.record(HostCall::Close(window))
    }

    fn show_window(&mut self, window: WindowHandle) -> Result<()> {
        self.record(HostCall::Show(window))
    }

    fn hide_window(&mut self, window: WindowHandle) -> Result<()> {
        self.record(HostCall::Hide(window))
    }

    fn minimize_window(&mut self, window: WindowHandle) -> Result<()> {
        self.record(HostCall::Minimize(window))
    }

    fn set_bounds(&mut self, window: WindowHandle, bounds: Rect) -> Result<()> {
        self.record(HostCall::SetBounds(window, bounds))
    }

    fn set_ignore_mouse_events(&mut self, window: WindowHandle, ignore: bool) -> Result<()> {
        self.record(HostCall::SetIgnoreMouse(window, ignore))
    }

    fn post_message(
        &mut self,
        window: WindowHandle,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<()> {
        self.record(HostCall::Post(window, topic.to_string(), payload.clone()))
    }

    fn displays(&self) -> Vec<Display> {
        self.lock().displays.clone()
    }
}
