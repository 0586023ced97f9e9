/// Update failures. The `Display` text is what content sees on `update-error`.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid update manifest: {0}")]
    Parse(String),

    #[error("downloaded update failed verification: {0}")]
    Integrity(String),

    #[error("update file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("install failed: {0}")]
    Install(String),
}

impl From<reqwest::Error> for UpdateError {
    fn from(e: reqwest::Error) -> Self {
        UpdateError::Network(e.to_string())
    }
}
