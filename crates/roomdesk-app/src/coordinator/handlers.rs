//! IPC topic handlers for content-emitted messages.

use roomdesk_common::types::WindowRole;
use roomdesk_ipc::{topics, IncomingMessage, IpcRouter};
use roomdesk_windows::display::{correct_point, select_display};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::session::Session;

/// Screen position reported when a share starts. Numbers may arrive as
/// floats or as unsigned-widened negatives.
#[derive(Debug, Deserialize)]
struct SharePosition {
    x: f64,
    y: f64,
}

pub(super) fn build_router() -> IpcRouter<Session> {
    let mut router = IpcRouter::new();
    register_update_handlers(&mut router);
    register_whiteboard_handlers(&mut router);
    register_annotation_handlers(&mut router);

    router.on(topics::APP_EXIT, |session: &mut Session, _msg: &IncomingMessage| {
        info!("App exit requested; closing satellites");
        for role in WindowRole::SATELLITES {
            session.windows.destroy(role);
        }
    });

    router
}

// =============================================================================
// UPDATES
// =============================================================================

fn register_update_handlers(router: &mut IpcRouter<Session>) {
    router.on(topics::CHECK_FOR_UPDATE, |session: &mut Session, _msg: &IncomingMessage| {
        match session.updater.as_mut() {
            Some(updater) => {
                info!("Manual update check requested");
                updater.check_now();
            }
            None => debug!("Update check requested but updates are disabled"),
        }
    });

    router.on(topics::QUIT_AND_INSTALL, |session: &mut Session, _msg: &IncomingMessage| {
        if let Some(updater) = session.updater.as_mut() {
            updater.quit_and_install();
        }
    });
}

// =============================================================================
// WHITEBOARD
// =============================================================================

fn register_whiteboard_handlers(router: &mut IpcRouter<Session>) {
    router.on(topics::WHITEBOARD_SHOW, |session: &mut Session, _msg: &IncomingMessage| {
        session.windows.show(WindowRole::Whiteboard);
    });

    router.on(topics::WHITEBOARD_HIDE, |session: &mut Session, _msg: &IncomingMessage| {
        session.notify(WindowRole::Whiteboard, topics::WHITEBOARD_CLEAR);
        session.windows.hide(WindowRole::Whiteboard);
    });

    router.on(topics::WHITEBOARD_STOP, |session: &mut Session, _msg: &IncomingMessage| {
        session.windows.hide(WindowRole::Whiteboard);
        session.notify(WindowRole::Main, topics::WHITEBOARD_STOP);
    });

    router.on(topics::WHITEBOARD_SAVE, |session: &mut Session, _msg: &IncomingMessage| {
        session.notify(WindowRole::Main, topics::WHITEBOARD_SAVE);
    });
}

// =============================================================================
// ANNOTATION
// =============================================================================

fn register_annotation_handlers(router: &mut IpcRouter<Session>) {
    router.on(topics::ANNOTATION_START, |session: &mut Session, _msg: &IncomingMessage| {
        session.windows.minimize(WindowRole::Main);
        session.windows.set_ignore_mouse_events(WindowRole::Annotation, false);
        session.notify(WindowRole::Annotation, topics::ANNOTATION_STARTED);
        session.windows.show(WindowRole::Annotation);
    });

    router.on(topics::ANNOTATION_STOP, |session: &mut Session, _msg: &IncomingMessage| {
        stop_annotating(session);
        session.windows.show(WindowRole::Main);
    });

    router.on(
        topics::ANNOTATION_STOP_FROM_WINDOW,
        |session: &mut Session, _msg: &IncomingMessage| {
            stop_annotating(session);
            session.notify(WindowRole::Main, topics::ANNOTATION_STOP_FROM_WINDOW);
            session.windows.show(WindowRole::Main);
        },
    );

    router.on(topics::SCREEN_SHARE_STARTED, |session: &mut Session, msg: &IncomingMessage| {
        let Some(position) = msg.payload_as::<SharePosition>() else {
            warn!(payload = %msg.payload, "Screen share start without a position");
            return;
        };
        place_overlay(session, position);
    });

    router.on(topics::SCREEN_SHARE_STOPPED, |session: &mut Session, _msg: &IncomingMessage| {
        session.windows.set_ignore_mouse_events(WindowRole::Annotation, true);
        clear_overlay(session);
    });

    router.on(topics::ANNOTATION_HIDE, |session: &mut Session, _msg: &IncomingMessage| {
        clear_overlay(session);
    });
}

fn stop_annotating(session: &mut Session) {
    session.windows.set_ignore_mouse_events(WindowRole::Annotation, true);
    session.notify(WindowRole::Annotation, topics::ANNOTATION_STOPPED);
}

fn clear_overlay(session: &mut Session) {
    session.notify(WindowRole::Annotation, topics::ANNOTATION_STOPPED);
    session.notify(WindowRole::Annotation, topics::ANNOTATION_CLEAR);
    session.windows.hide(WindowRole::Annotation);
}

/// Cover the shared display with the click-through overlay.
fn place_overlay(session: &mut Session, position: SharePosition) {
    if !session.windows.is_alive(WindowRole::Annotation) {
        debug!("Screen share started without an annotation window");
        return;
    }

    let point = correct_point(position.x.round() as i64, position.y.round() as i64);
    let displays = session.windows.displays();
    let Some(target) = select_display(&displays, point, session.layout.display_tolerance_px)
    else {
        warn!(x = point.x, y = point.y, "No display matches the shared screen");
        return;
    };

    debug!(display_id = target.id, x = point.x, y = point.y, "Placing annotation overlay");
    session.windows.set_bounds(WindowRole::Annotation, target.work_area);
    session.windows.set_ignore_mouse_events(WindowRole::Annotation, true);
    session.windows.show(WindowRole::Annotation);
}
