//! IPC topic names shared by the coordinator and window content.

// Deep-link actions forwarded to main.
pub const LAUNCH_ROOM: &str = "launch-room";
pub const JOIN_MEETING: &str = "join-meeting";
pub const OPEN_SETTINGS: &str = "open-settings";
pub const SHOW_NOTIFICATION: &str = "show-notification";

// Update controller -> main.
pub const UPDATE_AVAILABLE: &str = "update-available";
pub const UPDATE_NOT_AVAILABLE: &str = "update-not-available";
pub const DOWNLOAD_PROGRESS: &str = "download-progress";
pub const UPDATE_DOWNLOADED: &str = "update-downloaded";
pub const UPDATE_ERROR: &str = "update-error";

// Main -> update controller.
pub const CHECK_FOR_UPDATE: &str = "check-for-update";
pub const QUIT_AND_INSTALL: &str = "quit-and-install";

pub const MAIN_PROCESS_MESSAGE: &str = "main-process-message";
pub const APP_EXIT: &str = "app-exit";

// Whiteboard.
pub const WHITEBOARD_SHOW: &str = "whiteboard:show-window";
pub const WHITEBOARD_HIDE: &str = "whiteboard:hide-window";
pub const WHITEBOARD_CLEAR: &str = "whiteboard:clear";
pub const WHITEBOARD_WINDOW_CLOSED: &str = "whiteboard:window-closed";
pub const WHITEBOARD_STOP: &str = "whiteboard:stop-from-whiteboard-window";
pub const WHITEBOARD_SAVE: &str = "whiteboard:save-from-whiteboard-window";

// Annotation overlay.
pub const ANNOTATION_START: &str = "annotation:start-annotating";
pub const ANNOTATION_STOP: &str = "annotation:stop-annotating";
pub const ANNOTATION_STOP_FROM_WINDOW: &str = "annotation:stop-from-annotation-window";
pub const ANNOTATION_STARTED: &str = "annotation:annotating-started";
pub const ANNOTATION_STOPPED: &str = "annotation:annotating-stopped";
pub const ANNOTATION_CLEAR: &str = "annotation:clear";
pub const ANNOTATION_HIDE: &str = "annotation:hide";
pub const SCREEN_SHARE_STARTED: &str = "annotation:screen-share-started";
pub const SCREEN_SHARE_STOPPED: &str = "annotation:screen-share-stopped";
