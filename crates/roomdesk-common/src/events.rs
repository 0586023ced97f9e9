use serde::{Deserialize, Serialize};

use crate::types::{Display, WindowHandle};

/// Events reported by the windowing host. Each one is handled as a single
/// non-interleaved turn of the coordinator loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum HostEvent {
    /// The host finished starting and knows its displays.
    Ready {
        displays: Vec<Display>,
        /// Id of the primary display. Overrides any per-display `primary`
        /// flag when present.
        #[serde(default, rename = "primaryDisplay", skip_serializing_if = "Option::is_none")]
        primary_display: Option<u32>,
        #[serde(default, rename = "screenAccess")]
        screen_access: bool,
    },
    DisplaysChanged {
        displays: Vec<Display>,
    },
    /// The user asked to close a window. Nothing happens until the
    /// coordinator answers with a close or hide command.
    CloseRequested {
        window: WindowHandle,
    },
    /// The host destroyed a window.
    Closed {
        window: WindowHandle,
    },
    /// A window's content finished loading.
    ContentReady {
        window: WindowHandle,
    },
    /// A one-way message emitted by window content.
    Ipc {
        window: WindowHandle,
        topic: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
    /// The OS redelivered a deep link to the running process.
    OpenUrl {
        url: String,
    },
    AllClosed,
    Quit,
    #[serde(other)]
    Unknown,
}

impl HostEvent {
    /// Parse one line of the host bridge protocol.
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(error = %e, line_len = raw.len(), "malformed host event");
                None
            }
        }
    }

    /// Display geometry carried by this event, with the primary flag
    /// resolved. `None` for events that say nothing about displays.
    pub fn reported_displays(&self) -> Option<Vec<Display>> {
        match self {
            HostEvent::Ready {
                displays,
                primary_display: Some(primary),
                ..
            } => Some(
                displays
                    .iter()
                    .cloned()
                    .map(|mut d| {
                        d.primary = d.id == *primary;
                        d
                    })
                    .collect(),
            ),
            HostEvent::Ready { displays, .. } | HostEvent::DisplaysChanged { displays } => {
                Some(displays.clone())
            }
            _ => None,
        }
    }
}
