//! Topic registration and dispatch.

use std::collections::HashMap;

use roomdesk_common::types::WindowRole;
use roomdesk_windows::WindowRegistry;
use tracing::{debug, warn};

use crate::message::{IncomingMessage, IpcMessage};

/// Anything that can deliver a message to a window addressed by role.
pub trait MessageSink {
    /// Deliver at most once. Returns `false` when the window is absent or
    /// delivery failed; callers never treat that as an error.
    fn deliver(&mut self, role: WindowRole, message: &IpcMessage) -> bool;
}

impl MessageSink for WindowRegistry {
    fn deliver(&mut self, role: WindowRole, message: &IpcMessage) -> bool {
        self.post(role, &message.topic, &message.payload)
    }
}

/// Fire-and-forget send. Never fails, never waits for acknowledgement.
pub fn send<S: MessageSink + ?Sized>(
    sink: &mut S,
    role: WindowRole,
    topic: &str,
    payload: serde_json::Value,
) -> bool {
    let delivered = sink.deliver(role, &IpcMessage::new(topic, payload));
    debug!(%role, topic, delivered, "IPC send");
    delivered
}

type Handler<C> = Box<dyn Fn(&mut C, &IncomingMessage)>;

/// Routes content-emitted topics to handlers over a context `C`.
///
/// Several handlers may share a topic; all of them run, in registration
/// order. Handlers receive the context mutably, so the router itself holds
/// no component state.
pub struct IpcRouter<C> {
    handlers: HashMap<String, Vec<Handler<C>>>,
}

impl<C> IpcRouter<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for `topic`.
    pub fn on<F>(&mut self, topic: impl Into<String>, handler: F)
    where
        F: Fn(&mut C, &IncomingMessage) + 'static,
    {
        self.handlers
            .entry(topic.into())
            .or_default()
            .push(Box::new(handler));
    }

    /// Run every handler registered for the message's topic. Returns how
    /// many ran; unregistered topics are logged and dropped.
    pub fn dispatch(&self, ctx: &mut C, message: &IncomingMessage) -> usize {
        let Some(handlers) = self.handlers.get(&message.topic) else {
            warn!(
                sender = %message.sender,
                topic = %message.topic,
                "IPC message rejected: no handler for topic"
            );
            return 0;
        };

        debug!(sender = %message.sender, topic = %message.topic, "IPC message dispatched");
        for handler in handlers {
            handler(ctx, message);
        }
        handlers.len()
    }

    pub fn has_handlers(&self, topic: &str) -> bool {
        self.handlers.contains_key(topic)
    }

    /// Registered topics, sorted.
    pub fn topics(&self) -> Vec<&str> {
        let mut topics: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        topics.sort_unstable();
        topics
    }
}

impl<C> Default for IpcRouter<C> {
    fn default() -> Self {
        Self::new()
    }
}
