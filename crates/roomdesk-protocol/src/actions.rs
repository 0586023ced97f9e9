//! The deep-link action table.

use std::collections::HashMap;
use std::fmt;

use roomdesk_common::types::WindowRole;
use roomdesk_ipc::{send, topics, MessageSink};
use serde_json::json;

use crate::link::DeepLink;

/// Every action a deep link can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeepLinkAction {
    LaunchRoom,
    JoinMeeting,
    OpenSettings,
    ShowNotification,
}

impl DeepLinkAction {
    pub const ALL: [DeepLinkAction; 4] = [
        DeepLinkAction::LaunchRoom,
        DeepLinkAction::JoinMeeting,
        DeepLinkAction::OpenSettings,
        DeepLinkAction::ShowNotification,
    ];

    /// The action name as it appears in a URL (and as the IPC topic).
    pub fn as_str(&self) -> &'static str {
        match self {
            DeepLinkAction::LaunchRoom => topics::LAUNCH_ROOM,
            DeepLinkAction::JoinMeeting => topics::JOIN_MEETING,
            DeepLinkAction::OpenSettings => topics::OPEN_SETTINGS,
            DeepLinkAction::ShowNotification => topics::SHOW_NOTIFICATION,
        }
    }
}

impl fmt::Display for DeepLinkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type ActionHandler = Box<dyn Fn(&DeepLink, &mut dyn MessageSink) + Send + Sync>;

/// Action name -> handler. Immutable once built; share it behind an `Arc`.
pub struct ActionTable {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionTable {
    pub fn builder() -> ActionTableBuilder {
        ActionTableBuilder {
            handlers: HashMap::new(),
        }
    }

    /// The standard actions, each forwarding to the main window over IPC.
    pub fn with_defaults() -> Self {
        Self::builder()
            .action(DeepLinkAction::LaunchRoom.as_str(), |link, sink| {
                let room_id = link.param_or("roomId", "");
                send(sink, WindowRole::Main, topics::LAUNCH_ROOM, json!(room_id));
            })
            .action(DeepLinkAction::JoinMeeting.as_str(), |link, sink| {
                let payload = json!({
                    "meetingId": link.param_or("meetingId", ""),
                    "password": link.param_or("password", ""),
                });
                send(sink, WindowRole::Main, topics::JOIN_MEETING, payload);
            })
            .action(DeepLinkAction::OpenSettings.as_str(), |link, sink| {
                let section = link.param_or("section", "general");
                send(sink, WindowRole::Main, topics::OPEN_SETTINGS, json!(section));
            })
            .action(DeepLinkAction::ShowNotification.as_str(), |link, sink| {
                let payload = json!({
                    "title": link.param_or("title", ""),
                    "message": link.param_or("message", ""),
                    "severity": link.param_or("severity", "info"),
                });
                send(sink, WindowRole::Main, topics::SHOW_NOTIFICATION, payload);
            })
            .build()
    }

    pub fn get(&self, action: &str) -> Option<&ActionHandler> {
        self.handlers.get(action)
    }

    pub fn contains(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Action names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

pub struct ActionTableBuilder {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionTableBuilder {
    /// Register a handler. A later registration for the same name replaces
    /// the earlier one.
    pub fn action<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&DeepLink, &mut dyn MessageSink) + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    pub fn build(self) -> ActionTable {
        ActionTable {
            handlers: self.handlers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomdesk_ipc::IpcMessage;

    #[derive(Default)]
    struct Recorder(Vec<(WindowRole, IpcMessage)>);

    impl MessageSink for Recorder {
        fn deliver(&mut self, role: WindowRole, message: &IpcMessage) -> bool {
            self.0.push((role, message.clone()));
            true
        }
    }

    fn run(link: DeepLink) -> IpcMessage {
        let table = ActionTable::with_defaults();
        let mut sink = Recorder::default();
        let handler = table.get(&link.action).unwrap();
        handler(&link, &mut sink);
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].0, WindowRole::Main);
        sink.0.remove(0).1
    }

    #[test]
    fn default_table_has_every_action() {
        let table = ActionTable::with_defaults();
        for action in DeepLinkAction::ALL {
            assert!(table.contains(action.as_str()), "{action} missing");
        }
        assert_eq!(table.names().len(), DeepLinkAction::ALL.len());
    }

    #[test]
    fn launch_room_sends_room_id() {
        let msg = run(DeepLink::new("launch-room").with_param("roomId", "123"));
        assert_eq!(msg, IpcMessage::new(topics::LAUNCH_ROOM, json!("123")));
    }

    #[test]
    fn launch_room_defaults_to_empty_id() {
        let msg = run(DeepLink::new("launch-room"));
        assert_eq!(msg.payload, json!(""));
    }

    #[test]
    fn join_meeting_sends_id_and_password() {
        let msg = run(
            DeepLink::new("join-meeting")
                .with_param("meetingId", "m-1")
                .with_param("password", "pw"),
        );
        assert_eq!(msg.topic, topics::JOIN_MEETING);
        assert_eq!(msg.payload, json!({"meetingId": "m-1", "password": "pw"}));
    }

    #[test]
    fn open_settings_defaults_to_general() {
        let msg = run(DeepLink::new("open-settings"));
        assert_eq!(msg.payload, json!("general"));
        let msg = run(DeepLink::new("open-settings").with_param("section", "audio"));
        assert_eq!(msg.payload, json!("audio"));
    }

    #[test]
    fn show_notification_defaults_to_info() {
        let msg = run(DeepLink::new("show-notification").with_param("title", "Hi"));
        assert_eq!(
            msg.payload,
            json!({"title": "Hi", "message": "", "severity": "info"})
        );
    }

    #[test]
    fn builder_accepts_custom_actions() {
        let table = ActionTable::builder()
            .action("ping", |_link, sink| {
                send(sink, WindowRole::Whiteboard, "pong", serde_json::Value::Null);
            })
            .build();
        assert_eq!(table.names(), vec!["ping"]);
        assert!(!table.contains("launch-room"));
    }
}
