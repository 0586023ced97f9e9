mod common;

use common::*;
use roomdesk_common::events::HostEvent;
use roomdesk_common::types::WindowRole;
use roomdesk_config::RoomdeskConfig;
use roomdesk_ipc::topics;
use serde_json::json;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn packaged_launch_link_is_delivered_after_main_content_ready() {
    let (mut c, host) = coordinator(&RoomdeskConfig::default());
    c.start(&args(&["/opt/roomdesk/roomdesk", "trtcroom://launch-room?roomId=123"]));
    c.handle_event(ready());
    c.handle_event(HostEvent::ContentReady { window: MAIN });

    let posts = host.posts();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].1, topics::MAIN_PROCESS_MESSAGE);
    assert_eq!((posts[1].1.as_str(), &posts[1].2), (topics::LAUNCH_ROOM, &json!("123")));
}

#[test]
fn unpacked_launch_skips_the_script_argument() {
    let mut config = RoomdeskConfig::default();
    config.app.packaged = false;
    let (mut c, _host) = coordinator(&config);

    // The script path sits where a packaged build would put the link.
    c.start(&args(&["/usr/bin/node", "trtcroom://open-settings", "--inspect"]));
    assert!(c.pending_deep_link().is_none());

    c.start(&args(&[
        "/usr/bin/node",
        "main.js",
        "trtcroom://join-meeting?meetingId=9&password=a%20b",
    ]));
    let pending = c.pending_deep_link().expect("link deferred");
    assert_eq!(pending.link.action, "join-meeting");
    assert_eq!(pending.link.params["password"], "a b");
}

#[test]
fn link_for_another_scheme_is_ignored() {
    let (mut c, _host) = coordinator(&RoomdeskConfig::default());
    c.start(&args(&["/opt/roomdesk/roomdesk", "zoommtg://launch-room?roomId=1"]));
    assert!(c.pending_deep_link().is_none());
}

#[test]
fn redelivered_link_before_ready_replaces_launch_link() {
    let (mut c, host) = coordinator(&RoomdeskConfig::default());
    c.start(&args(&["/opt/roomdesk/roomdesk", "trtcroom://launch-room?roomId=1"]));
    c.handle_event(HostEvent::OpenUrl {
        url: "trtcroom://show-notification?title=Hi&message=Welcome".into(),
    });
    c.handle_event(ready());
    c.handle_event(HostEvent::ContentReady { window: MAIN });

    let topics_sent = host.topics_for(MAIN);
    assert_eq!(
        topics_sent,
        vec![topics::MAIN_PROCESS_MESSAGE, topics::SHOW_NOTIFICATION]
    );
    let (_, _, payload) = host.posts().pop().unwrap();
    assert_eq!(
        payload,
        json!({"title": "Hi", "message": "Welcome", "severity": "info"})
    );
}

#[test]
fn unknown_action_is_dropped_at_runtime() {
    let (mut c, host) = started();
    c.handle_event(HostEvent::ContentReady { window: MAIN });
    c.handle_event(HostEvent::OpenUrl {
        url: "trtcroom://format-disk".into(),
    });
    assert_eq!(host.topics_for(MAIN), vec![topics::MAIN_PROCESS_MESSAGE]);
}

#[test]
fn link_after_main_closed_waits_for_the_next_main() {
    let (mut c, host) = started();
    c.handle_event(HostEvent::ContentReady { window: MAIN });
    c.handle_event(HostEvent::CloseRequested { window: MAIN });
    assert!(!c.session().is_main_ready());

    c.handle_event(HostEvent::OpenUrl {
        url: "trtcroom://open-settings".into(),
    });
    assert!(c.pending_deep_link().is_some());

    c.handle_event(ready());
    let new_main = c.windows().get(WindowRole::Main).unwrap();
    c.handle_event(HostEvent::ContentReady { window: new_main });
    assert_eq!(
        host.topics_for(new_main),
        vec![topics::MAIN_PROCESS_MESSAGE, topics::OPEN_SETTINGS]
    );
    let (_, _, payload) = host.posts().pop().unwrap();
    assert_eq!(payload, json!("general"));
}
