//! Window options per role.

use std::path::{Path, PathBuf};

use roomdesk_common::types::Rect;
use serde::{Deserialize, Serialize};

/// Where a window's content is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentSource {
    Url {
        url: String,
    },
    File {
        path: PathBuf,
        #[serde(skip_serializing_if = "Option::is_none")]
        hash: Option<String>,
    },
}

impl ContentSource {
    /// Resolve a renderer route against either a dev server or the packaged
    /// entry document. The route becomes the URL fragment.
    pub fn for_route(dev_server: Option<&str>, entry: &Path, route: Option<&str>) -> Self {
        match (dev_server, route) {
            (Some(base), Some(route)) => ContentSource::Url {
                url: format!("{}#/{route}", base.trim_end_matches('/')),
            },
            (Some(base), None) => ContentSource::Url {
                url: base.to_string(),
            },
            (None, route) => ContentSource::File {
                path: entry.to_path_buf(),
                hash: route.map(str::to_string),
            },
        }
    }
}

/// Configuration for creating a new top-level window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<(u32, u32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<(i32, i32)>,
    /// Whether the window is shown as soon as it is created.
    pub show: bool,
    pub transparent: bool,
    pub frame: bool,
    pub skip_taskbar: bool,
    pub always_on_top: bool,
    pub resizable: bool,
    pub minimizable: bool,
    pub menu_bar: bool,
    /// Content may not open new windows; `https:` links go to the browser.
    pub deny_new_windows: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preload: Option<PathBuf>,
    pub content: ContentSource,
}

impl WindowSpec {
    fn base(title: &str, width: u32, height: u32, content: ContentSource) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
            min_size: None,
            position: None,
            show: true,
            transparent: false,
            frame: true,
            skip_taskbar: false,
            always_on_top: false,
            resizable: true,
            minimizable: true,
            menu_bar: true,
            deny_new_windows: true,
            preload: None,
            content,
        }
    }

    /// The session window, filling the primary display's work area.
    pub fn main(work_area: Rect, min_size: (u32, u32), content: ContentSource) -> Self {
        let mut spec = Self::base(
            "Main window",
            work_area.width.max(min_size.0),
            work_area.height.max(min_size.1),
            content,
        );
        spec.min_size = Some(min_size);
        spec.position = Some((work_area.x, work_area.y));
        spec
    }

    /// The whiteboard, created hidden and without a menu bar.
    pub fn whiteboard(width: u32, height: u32, content: ContentSource) -> Self {
        let mut spec = Self::base("Whiteboard window", width, height, content);
        spec.show = false;
        spec.menu_bar = false;
        spec
    }

    /// The transparent, click-through-capable screen annotation overlay.
    pub fn annotation(content: ContentSource) -> Self {
        let mut spec = Self::base("Annotation window", 100, 100, content);
        spec.show = false;
        spec.transparent = true;
        spec.frame = false;
        spec.skip_taskbar = true;
        spec.always_on_top = true;
        spec.minimizable = false;
        spec.resizable = false;
        spec.menu_bar = false;
        spec
    }

    pub fn with_preload(mut self, preload: Option<PathBuf>) -> Self {
        self.preload = preload;
        self
    }
}
