//! Startup, host events, update turns and shutdown.

use roomdesk_common::events::HostEvent;
use roomdesk_common::types::{WindowHandle, WindowRole};
use roomdesk_ipc::{topics, IncomingMessage};
use roomdesk_updater::{Completion, SchedulerTick, UpdateScheduler};
use roomdesk_windows::CloseOutcome;
use serde_json::json;
use tracing::{debug, error, info, warn};

use super::{Coordinator, Flow};
use roomdesk_protocol::PendingDeepLink;

impl Coordinator {
    // =========================================================================
    // STARTUP
    // =========================================================================

    /// Register the URL scheme and hold any deep link found in the launch
    /// arguments until main's content is ready.
    pub fn start(&mut self, launch_args: &[String]) {
        info!(scheme = %self.protocol.scheme(), packaged = self.packaged, "Starting coordinator");
        if let Some(pending) = self.protocol.register_launch_handling(launch_args, self.packaged) {
            info!(action = %pending.link.action, "Deferring launch deep link until main is ready");
            self.session.pending_link = Some(pending);
        }
    }

    /// Handle one host event as a single turn.
    pub fn handle_event(&mut self, event: HostEvent) -> Flow {
        if self.shut_down {
            debug!(?event, "Ignoring host event after shutdown");
            return Flow::Exit;
        }

        match event {
            HostEvent::Ready { screen_access, .. } => self.on_ready(screen_access),
            HostEvent::DisplaysChanged { displays } => {
                debug!(count = displays.len(), "Displays changed");
            }
            HostEvent::CloseRequested { window } => self.on_close_requested(window),
            HostEvent::Closed { window } => self.on_closed(window),
            HostEvent::ContentReady { window } => self.on_content_ready(window),
            HostEvent::Ipc {
                window,
                topic,
                payload,
            } => self.on_ipc(window, topic, payload),
            HostEvent::OpenUrl { url } => self.on_open_url(&url),
            HostEvent::AllClosed => {
                info!("All windows closed");
                self.session.windows.clear_all();
                self.session.main_ready = false;
            }
            HostEvent::Quit => {
                self.shutdown();
                return Flow::Exit;
            }
            HostEvent::Unknown => debug!("Ignoring unknown host event"),
        }

        self.end_turn()
    }

    /// Create main, then both satellites, then start the update timers.
    fn on_ready(&mut self, screen_access: bool) {
        self.session.screen_access = screen_access;
        if self.session.windows.is_alive(WindowRole::Main) {
            debug!("Host ready again; main already exists");
            return;
        }

        let displays = self.session.windows.displays();
        let created = self
            .session
            .layout
            .main_spec(&displays)
            .and_then(|spec| self.session.windows.create(WindowRole::Main, &spec));
        if let Err(e) = created {
            error!(error = %e, "Failed to create main window");
            return;
        }
        self.session.main_ready = false;

        for role in WindowRole::SATELLITES {
            let Some(spec) = self.session.layout.satellite_spec(role) else {
                continue;
            };
            if let Err(e) = self.session.windows.create(role, &spec) {
                error!(%role, error = %e, "Failed to create window");
            }
        }

        self.start_update_timers();
    }

    fn start_update_timers(&mut self) {
        if self.scheduler.is_some() {
            return;
        }
        let Some((startup_delay, interval)) = self.update_timers else {
            return;
        };
        info!(
            startup_delay_secs = startup_delay.as_secs(),
            interval_secs = interval.as_secs(),
            "Starting update timers"
        );
        let (scheduler, ticks) = UpdateScheduler::start(startup_delay, interval);
        self.scheduler = Some(scheduler);
        self.scheduler_ticks = Some(ticks);
    }

    // =========================================================================
    // WINDOW EVENTS
    // =========================================================================

    fn on_content_ready(&mut self, window: WindowHandle) {
        let Some(role) = self.session.windows.role_of(window) else {
            debug!(%window, "Content ready for unknown window");
            return;
        };
        debug!(%role, "Content ready");
        if role != WindowRole::Main {
            return;
        }

        self.session.main_ready = true;
        let screen_access = self.session.screen_access;
        self.session.send(
            WindowRole::Main,
            topics::MAIN_PROCESS_MESSAGE,
            json!({ "isHasScreen": screen_access }),
        );

        if let Some(pending) = self.session.pending_link.take() {
            info!(action = %pending.link.action, "Dispatching deferred deep link");
            self.protocol.dispatch(&pending.link, &mut self.session.windows);
        }
    }

    fn on_close_requested(&mut self, window: WindowHandle) {
        let Some(role) = self.session.windows.role_of(window) else {
            debug!(%window, "Close requested for unknown window");
            return;
        };

        match self.session.windows.handle_close_requested(role) {
            CloseOutcome::Intercepted => {
                if role == WindowRole::Whiteboard {
                    self.session.notify(WindowRole::Main, topics::WHITEBOARD_WINDOW_CLOSED);
                }
            }
            CloseOutcome::Destroyed(roles) => {
                info!(?roles, "Windows closed");
                if roles.contains(&WindowRole::Main) {
                    self.session.main_ready = false;
                }
            }
            CloseOutcome::Ignored => {}
        }
    }

    fn on_closed(&mut self, window: WindowHandle) {
        let Some(role) = self.session.windows.role_of(window) else {
            return;
        };
        let removed = self.session.windows.handle_closed(role);
        if removed.contains(&WindowRole::Main) {
            self.session.main_ready = false;
        }
    }

    fn on_ipc(&mut self, window: WindowHandle, topic: String, payload: serde_json::Value) {
        let Some(sender) = self.session.windows.role_of(window) else {
            warn!(%window, %topic, "IPC message rejected: unknown window");
            return;
        };
        let message = IncomingMessage::new(sender, topic, payload);
        self.router.dispatch(&mut self.session, &message);
    }

    // =========================================================================
    // DEEP LINKS
    // =========================================================================

    /// A link redelivered by the OS. Before main is ready it replaces any
    /// pending link; afterwards it is dispatched immediately.
    fn on_open_url(&mut self, url: &str) {
        if self.session.main_ready {
            self.protocol.on_incoming_url(url, &mut self.session.windows);
            return;
        }
        match self.protocol.parse(url) {
            Ok(link) => {
                info!(action = %link.action, "Deferring deep link until main is ready");
                self.session.pending_link = Some(PendingDeepLink {
                    link,
                    raw: url.to_string(),
                });
            }
            Err(e) => warn!(url, error = %e, "Dropping malformed deep link"),
        }
    }

    // =========================================================================
    // UPDATES
    // =========================================================================

    pub fn handle_update_completion(&mut self, completion: Completion) -> Flow {
        if self.shut_down {
            return Flow::Exit;
        }
        if let Some(updater) = self.session.updater.as_mut() {
            updater.handle_completion(completion);
        }
        self.end_turn()
    }

    pub fn handle_scheduler_tick(&mut self, tick: SchedulerTick) -> Flow {
        if self.shut_down {
            return Flow::Exit;
        }
        if let Some(updater) = self.session.updater.as_mut() {
            debug!(?tick, "Scheduled update check");
            updater.check_now();
        }
        self.end_turn()
    }

    /// Forward update notices and honour a pending install exit.
    fn end_turn(&mut self) -> Flow {
        self.session.flush_update_notices();
        if self.session.update_exit_requested() {
            self.shutdown();
            return Flow::Exit;
        }
        Flow::Continue
    }

    // =========================================================================
    // SHUTDOWN
    // =========================================================================

    /// Tear everything down in order:
    /// 1. Cancel both update timers
    /// 2. Destroy all windows (satellites first, main last)
    ///
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        info!("Initiating graceful shutdown");

        if let Some(scheduler) = self.scheduler.take() {
            scheduler.cancel();
        }
        self.scheduler_ticks = None;

        let destroyed = self.session.windows.destroy_all();
        debug!(?destroyed, "Windows destroyed");
        self.session.main_ready = false;
        self.session.pending_link = None;
        self.shut_down = true;

        info!("Graceful shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomdesk_common::types::{Display, Rect};
    use roomdesk_config::RoomdeskConfig;
    use roomdesk_protocol::NoopRegistrar;
    use roomdesk_windows::testing::{HostCall, RecordingHost};
    use roomdesk_windows::WindowState;

    const MAIN: WindowHandle = WindowHandle(1);
    const WHITEBOARD: WindowHandle = WindowHandle(2);
    const ANNOTATION: WindowHandle = WindowHandle(3);

    fn coordinator() -> (Coordinator, RecordingHost) {
        let host = RecordingHost::new();
        let coordinator = Coordinator::new(
            &RoomdeskConfig::default(),
            Box::new(host.clone()),
            Box::new(NoopRegistrar),
            None,
        );
        (coordinator, host)
    }

    fn ready() -> HostEvent {
        HostEvent::Ready {
            displays: Vec::new(),
            primary_display: None,
            screen_access: true,
        }
    }

    fn ipc(window: WindowHandle, topic: &str) -> HostEvent {
        HostEvent::Ipc {
            window,
            topic: topic.into(),
            payload: serde_json::Value::Null,
        }
    }

    #[test]
    fn ready_creates_main_then_satellites() {
        let (mut c, host) = coordinator();
        assert_eq!(c.handle_event(ready()), Flow::Continue);

        let created: Vec<_> = host
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Create(role, _) => Some(role),
                _ => None,
            })
            .collect();
        assert_eq!(
            created,
            vec![WindowRole::Main, WindowRole::Whiteboard, WindowRole::Annotation]
        );
        assert!(!c.session().is_main_ready());
        assert!(!c.timers_running());
    }

    #[test]
    fn second_ready_creates_nothing() {
        let (mut c, host) = coordinator();
        c.handle_event(ready());
        c.handle_event(ready());
        assert_eq!(host.created_count(), 3);
    }

    #[test]
    fn ready_without_display_creates_nothing() {
        let (mut c, host) = coordinator();
        host.set_displays(Vec::new());
        c.handle_event(ready());
        assert_eq!(host.created_count(), 0);
        assert!(c.windows().live_roles().is_empty());
    }

    #[test]
    fn content_ready_reports_screen_access() {
        let (mut c, host) = coordinator();
        c.handle_event(ready());
        c.handle_event(HostEvent::ContentReady { window: MAIN });

        assert!(c.session().is_main_ready());
        let posts = host.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].1, topics::MAIN_PROCESS_MESSAGE);
        assert_eq!(posts[0].2, json!({ "isHasScreen": true }));
    }

    #[test]
    fn satellite_content_ready_does_not_mark_main_ready() {
        let (mut c, _host) = coordinator();
        c.handle_event(ready());
        c.handle_event(HostEvent::ContentReady { window: WHITEBOARD });
        assert!(!c.session().is_main_ready());
    }

    #[test]
    fn launch_link_waits_for_main_content() {
        let (mut c, host) = coordinator();
        c.start(&[
            "/opt/roomdesk".to_string(),
            "trtcroom://launch-room?roomId=42".to_string(),
        ]);
        assert!(c.pending_deep_link().is_some());

        c.handle_event(ready());
        assert!(host.topics_for(MAIN).is_empty());

        c.handle_event(HostEvent::ContentReady { window: MAIN });
        assert_eq!(
            host.topics_for(MAIN),
            vec![topics::MAIN_PROCESS_MESSAGE, topics::LAUNCH_ROOM]
        );
        assert!(c.pending_deep_link().is_none());

        // A reload of main's content must not replay the link.
        c.handle_event(HostEvent::ContentReady { window: MAIN });
        assert_eq!(
            host.topics_for(MAIN),
            vec![
                topics::MAIN_PROCESS_MESSAGE,
                topics::LAUNCH_ROOM,
                topics::MAIN_PROCESS_MESSAGE
            ]
        );
    }

    #[test]
    fn open_url_before_ready_replaces_pending_link() {
        let (mut c, host) = coordinator();
        c.handle_event(HostEvent::OpenUrl {
            url: "trtcroom://launch-room?roomId=1".into(),
        });
        c.handle_event(HostEvent::OpenUrl {
            url: "trtcroom://open-settings?section=audio".into(),
        });
        assert_eq!(
            c.pending_deep_link().map(|p| p.link.action.as_str()),
            Some("open-settings")
        );

        c.handle_event(ready());
        c.handle_event(HostEvent::ContentReady { window: MAIN });
        let posts = host.posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].1, topics::OPEN_SETTINGS);
        assert_eq!(posts[1].2, json!("audio"));
    }

    #[test]
    fn open_url_after_ready_dispatches_immediately() {
        let (mut c, host) = coordinator();
        c.handle_event(ready());
        c.handle_event(HostEvent::ContentReady { window: MAIN });
        c.handle_event(HostEvent::OpenUrl {
            url: "trtcroom://join-meeting?meetingId=7&password=pw".into(),
        });
        let posts = host.posts();
        assert_eq!(posts.last().map(|p| p.1.as_str()), Some(topics::JOIN_MEETING));
        assert!(c.pending_deep_link().is_none());
    }

    #[test]
    fn malformed_open_url_is_dropped() {
        let (mut c, _host) = coordinator();
        c.handle_event(HostEvent::OpenUrl {
            url: "https://example.com".into(),
        });
        assert!(c.pending_deep_link().is_none());
    }

    #[test]
    fn closing_main_cascades() {
        let (mut c, host) = coordinator();
        c.handle_event(ready());
        c.handle_event(HostEvent::ContentReady { window: MAIN });
        c.handle_event(HostEvent::CloseRequested { window: MAIN });

        assert!(c.windows().live_roles().is_empty());
        assert!(!c.session().is_main_ready());
        let closes: Vec<_> = host
            .calls()
            .into_iter()
            .filter(|call| matches!(call, HostCall::Close(_)))
            .collect();
        assert_eq!(
            closes,
            vec![
                HostCall::Close(WHITEBOARD),
                HostCall::Close(ANNOTATION),
                HostCall::Close(MAIN)
            ]
        );
    }

    #[test]
    fn whiteboard_close_is_intercepted_and_reported() {
        let (mut c, host) = coordinator();
        c.handle_event(ready());
        c.handle_event(HostEvent::CloseRequested { window: WHITEBOARD });

        assert_eq!(c.windows().state(WindowRole::Whiteboard), Some(WindowState::Hidden));
        assert_eq!(host.topics_for(MAIN), vec![topics::WHITEBOARD_WINDOW_CLOSED]);
        assert!(!host.calls().contains(&HostCall::Close(WHITEBOARD)));
    }

    #[test]
    fn host_closing_main_clears_satellites() {
        let (mut c, _host) = coordinator();
        c.handle_event(ready());
        c.handle_event(HostEvent::Closed { window: MAIN });
        assert!(c.windows().live_roles().is_empty());
    }

    #[test]
    fn all_closed_keeps_running() {
        let (mut c, _host) = coordinator();
        c.handle_event(ready());
        assert_eq!(c.handle_event(HostEvent::AllClosed), Flow::Continue);
        assert!(c.windows().live_roles().is_empty());
        assert!(!c.is_shut_down());
    }

    #[test]
    fn ipc_from_unknown_window_is_rejected() {
        let (mut c, host) = coordinator();
        c.handle_event(ready());
        c.handle_event(ipc(WindowHandle(99), topics::WHITEBOARD_SHOW));
        assert!(!host.calls().contains(&HostCall::Show(WHITEBOARD)));
    }

    #[test]
    fn whiteboard_show_from_main() {
        let (mut c, host) = coordinator();
        c.handle_event(ready());
        c.handle_event(ipc(MAIN, topics::WHITEBOARD_SHOW));
        assert!(host.calls().contains(&HostCall::Show(WHITEBOARD)));
        assert_eq!(c.windows().state(WindowRole::Whiteboard), Some(WindowState::Visible));
    }

    #[test]
    fn screen_share_places_overlay_on_matching_display() {
        let (mut c, host) = coordinator();
        host.set_displays(vec![
            Display {
                id: 1,
                bounds: Rect::new(0, 0, 1920, 1080),
                work_area: Rect::new(0, 0, 1920, 1040),
                scale_factor: 1.0,
                primary: true,
            },
            Display {
                id: 2,
                bounds: Rect::new(-2560, 0, 2560, 1440),
                work_area: Rect::new(-2560, 25, 2560, 1415),
                scale_factor: 1.0,
                primary: false,
            },
        ]);
        c.handle_event(ready());
        host.clear_calls();

        // -2560 widened to an unsigned 32-bit value.
        c.handle_event(HostEvent::Ipc {
            window: MAIN,
            topic: topics::SCREEN_SHARE_STARTED.into(),
            payload: json!({ "x": 4_294_964_736u64, "y": 0 }),
        });
        assert_eq!(
            host.calls(),
            vec![
                HostCall::SetBounds(ANNOTATION, Rect::new(-2560, 25, 2560, 1415)),
                HostCall::SetIgnoreMouse(ANNOTATION, true),
                HostCall::Show(ANNOTATION),
            ]
        );
    }

    #[test]
    fn app_exit_closes_satellites_only() {
        let (mut c, _host) = coordinator();
        c.handle_event(ready());
        assert_eq!(c.handle_event(ipc(MAIN, topics::APP_EXIT)), Flow::Continue);
        assert_eq!(c.windows().live_roles(), vec![WindowRole::Main]);
    }

    #[test]
    fn quit_destroys_everything_and_exits() {
        let (mut c, host) = coordinator();
        c.handle_event(ready());
        assert_eq!(c.handle_event(HostEvent::Quit), Flow::Exit);
        assert!(c.is_shut_down());
        assert!(c.windows().live_roles().is_empty());
        assert_eq!(host.closed_count(), 3);

        // Later events are ignored.
        assert_eq!(c.handle_event(ready()), Flow::Exit);
        assert_eq!(host.created_count(), 3);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let (mut c, host) = coordinator();
        c.handle_event(ready());
        c.shutdown();
        c.shutdown();
        assert_eq!(host.closed_count(), 3);
    }

    #[test]
    fn update_topics_without_updater_are_harmless() {
        let (mut c, host) = coordinator();
        c.handle_event(ready());
        assert_eq!(c.handle_event(ipc(MAIN, topics::CHECK_FOR_UPDATE)), Flow::Continue);
        assert_eq!(c.handle_event(ipc(MAIN, topics::QUIT_AND_INSTALL)), Flow::Continue);
        assert!(host.posts().is_empty());
        assert!(c.update_state().is_none());
    }
}
