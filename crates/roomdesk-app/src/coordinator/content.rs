//! Window specs for the three roles, resolved from configuration.

use std::path::PathBuf;

use roomdesk_common::errors::WindowError;
use roomdesk_common::types::{Display, WindowRole};
use roomdesk_config::RoomdeskConfig;
use roomdesk_windows::{primary_display, ContentSource, WindowSpec};

const WHITEBOARD_ROUTE: &str = "whiteboard?isAnnotationWin=false";
const ANNOTATION_ROUTE: &str = "whiteboard?isAnnotationWin=true";

#[derive(Debug, Clone)]
pub struct WindowLayout {
    pub main_min_size: (u32, u32),
    pub whiteboard_size: (u32, u32),
    pub display_tolerance_px: u32,
    pub dev_server: Option<String>,
    pub renderer_entry: PathBuf,
    pub preload: Option<PathBuf>,
}

impl WindowLayout {
    pub fn from_config(config: &RoomdeskConfig) -> Self {
        let dev_server = if config.uses_dev_server() {
            config.content.dev_server_url.clone()
        } else {
            None
        };
        Self {
            main_min_size: (config.windows.main_min_width, config.windows.main_min_height),
            whiteboard_size: (
                config.windows.whiteboard_width,
                config.windows.whiteboard_height,
            ),
            display_tolerance_px: config.windows.display_tolerance_px,
            dev_server,
            renderer_entry: config.content.renderer_entry.clone(),
            preload: config.content.preload.clone(),
        }
    }

    fn content(&self, route: Option<&str>) -> ContentSource {
        ContentSource::for_route(self.dev_server.as_deref(), &self.renderer_entry, route)
    }

    /// Main fills the primary display's work area.
    pub fn main_spec(&self, displays: &[Display]) -> Result<WindowSpec, WindowError> {
        let primary = primary_display(displays).ok_or(WindowError::NoDisplay(WindowRole::Main))?;
        Ok(
            WindowSpec::main(primary.work_area, self.main_min_size, self.content(None))
                .with_preload(self.preload.clone()),
        )
    }

    pub fn whiteboard_spec(&self) -> WindowSpec {
        let (width, height) = self.whiteboard_size;
        WindowSpec::whiteboard(width, height, self.content(Some(WHITEBOARD_ROUTE)))
            .with_preload(self.preload.clone())
    }

    pub fn annotation_spec(&self) -> WindowSpec {
        WindowSpec::annotation(self.content(Some(ANNOTATION_ROUTE)))
            .with_preload(self.preload.clone())
    }

    pub fn satellite_spec(&self, role: WindowRole) -> Option<WindowSpec> {
        match role {
            WindowRole::Whiteboard => Some(self.whiteboard_spec()),
            WindowRole::Annotation => Some(self.annotation_spec()),
            WindowRole::Main => None,
        }
    }
}
