pub mod errors;
pub mod events;
pub mod types;

pub use errors::{ConfigError, ParseError, PlatformError, RoomdeskError, WindowError};
pub use events::HostEvent;
pub use types::{Display, Point, Rect, WindowHandle, WindowRole};

pub type Result<T> = std::result::Result<T, RoomdeskError>;
