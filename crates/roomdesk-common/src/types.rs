use serde::{Deserialize, Serialize};
use std::fmt;

/// The three fixed window purposes of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowRole {
    Main,
    Whiteboard,
    Annotation,
}

impl WindowRole {
    pub const ALL: [WindowRole; 3] = [
        WindowRole::Main,
        WindowRole::Whiteboard,
        WindowRole::Annotation,
    ];

    /// Roles whose lifetime is bounded by the main window.
    pub const SATELLITES: [WindowRole; 2] = [WindowRole::Whiteboard, WindowRole::Annotation];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowRole::Main => "main",
            WindowRole::Whiteboard => "whiteboard",
            WindowRole::Annotation => "annotation",
        }
    }

    pub fn is_satellite(&self) -> bool {
        !matches!(self, WindowRole::Main)
    }
}

impl fmt::Display for WindowRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque host-side window identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// Integer rectangle in screen (DIP) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A screen coordinate reported by content. Wider than `i32` because the
/// raw value may arrive widened to unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// Geometry of one attached display, as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Display {
    pub id: u32,
    pub bounds: Rect,
    pub work_area: Rect,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    #[serde(default)]
    pub primary: bool,
}

fn default_scale_factor() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display_is_lowercase() {
        assert_eq!(WindowRole::Main.to_string(), "main");
        assert_eq!(WindowRole::Whiteboard.to_string(), "whiteboard");
        assert_eq!(WindowRole::Annotation.to_string(), "annotation");
    }

    #[test]
    fn satellites_exclude_main() {
        assert!(!WindowRole::Main.is_satellite());
        assert!(WindowRole::SATELLITES.iter().all(|r| r.is_satellite()));
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&WindowRole::Annotation).unwrap();
        assert_eq!(json, "\"annotation\"");
    }

    #[test]
    fn handle_serializes_as_number() {
        let json = serde_json::to_string(&WindowHandle(7)).unwrap();
        assert_eq!(json, "7");
        assert_eq!(WindowHandle(7).to_string(), "window-7");
    }

    #[test]
    fn display_deserializes_camel_case_with_defaults() {
        let json = r#"{
            "id": 2,
            "bounds": {"x": 1920, "y": 0, "width": 2560, "height": 1440},
            "workArea": {"x": 1920, "y": 25, "width": 2560, "height": 1415}
        }"#;
        let display: Display = serde_json::from_str(json).unwrap();
        assert_eq!(display.work_area.y, 25);
        assert!((display.scale_factor - 1.0).abs() < f64::EPSILON);
        assert!(!display.primary);
    }
}
