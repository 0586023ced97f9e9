//! Display selection and coordinate correction for the annotation overlay.

use roomdesk_common::types::{Display, Point};

/// 2^32. Coordinates above [`WRAP_THRESHOLD`] are negative `i32` values
/// that were widened to unsigned in transit.
pub const U32_SPAN: i64 = 4_294_967_296;
pub const WRAP_THRESHOLD: i64 = 4_000_000_000;

/// Reinterpret a possibly unsigned-widened coordinate as signed.
pub fn correct_coordinate(raw: i64) -> i64 {
    if raw > WRAP_THRESHOLD {
        raw - U32_SPAN
    } else {
        raw
    }
}

pub fn correct_point(x: i64, y: i64) -> Point {
    Point {
        x: correct_coordinate(x),
        y: correct_coordinate(y),
    }
}

/// The display flagged primary, or the first one reported.
pub fn primary_display(displays: &[Display]) -> Option<&Display> {
    displays.iter().find(|d| d.primary).or_else(|| displays.first())
}

/// Find the display whose physical work-area origin (origin scaled by
/// pixel density) lies within `tolerance` pixels of `point` on both axes.
///
/// When several displays qualify the closest one wins; exact ties go to the
/// earliest reported display.
pub fn select_display(displays: &[Display], point: Point, tolerance: u32) -> Option<&Display> {
    let tolerance = f64::from(tolerance);
    let mut best: Option<(&Display, f64)> = None;

    for display in displays {
        let origin_x = f64::from(display.work_area.x) * display.scale_factor;
        let origin_y = f64::from(display.work_area.y) * display.scale_factor;
        let dx = (point.x as f64 - origin_x).abs();
        let dy = (point.y as f64 - origin_y).abs();
        if dx >= tolerance || dy >= tolerance {
            continue;
        }

        let distance = dx.hypot(dy);
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((display, distance)),
        }
    }

    best.map(|(display, _)| display)
}
