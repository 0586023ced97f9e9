use std::path::PathBuf;

use crate::types::WindowRole;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by the windowing host or the OS integration layer.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("window host error: {0}")]
    HostError(String),

    #[error("scheme registration error: {0}")]
    SchemeRegistration(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Window creation failures. Fatal to the feature, never to the process.
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("host refused to create {role} window: {reason}")]
    HostRefused { role: WindowRole, reason: String },

    #[error("no display available for {0} window")]
    NoDisplay(WindowRole),

    #[error("{0} window already exists")]
    AlreadyExists(WindowRole),

    #[error("{0} window requires a live main window")]
    MainRequired(WindowRole),
}

/// A deep link that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected scheme `{expected}:`")]
    WrongScheme { expected: String },

    #[error("missing `//` after scheme separator")]
    MissingAuthority,

    #[error("deep link names no action")]
    MissingAction,

    #[error("invalid percent-encoding in `{0}`")]
    InvalidEncoding(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RoomdeskError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}
