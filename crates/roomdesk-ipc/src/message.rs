//! IPC message envelopes.

use roomdesk_common::types::WindowRole;
use serde::{Deserialize, Serialize};

/// An outbound message to window content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    pub topic: String,
    /// Arbitrary JSON; `null` for topics without a payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl IpcMessage {
    pub fn new(topic: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// A message emitted by window content, tagged with the sending role.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    pub sender: WindowRole,
    pub topic: String,
    pub payload: serde_json::Value,
}

impl IncomingMessage {
    pub fn new(sender: WindowRole, topic: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            sender,
            topic: topic.into(),
            payload,
        }
    }

    /// Deserialize the payload into a typed shape.
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}
