//! Window lifecycle for the three session windows.
//!
//! - [`WindowHost`]: capability interface over the windowing host
//! - [`WindowRegistry`]: sole owner of window handles, keyed by role;
//!   enforces creation order, the close cascade, and close-intercept
//! - [`WindowSpec`]: per-role window options and content source
//! - [`display`]: display matching and cross-process coordinate correction

pub mod display;
pub mod host;
pub mod registry;
pub mod spec;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use display::{correct_coordinate, primary_display, select_display};
pub use host::WindowHost;
pub use registry::{CloseOutcome, WindowRegistry, WindowState};
pub use spec::{ContentSource, WindowSpec};
