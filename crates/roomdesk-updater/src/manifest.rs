//! The release descriptor published on the update feed.

use serde::{Deserialize, Serialize};

use crate::error::UpdateError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManifest {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub files: Vec<UpdateFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFile {
    /// Absolute, or relative to the feed URL.
    pub url: String,
    /// Base64 (as release tooling publishes it) or hex.
    pub sha512: String,
    /// Expected byte length; 0 when unknown.
    #[serde(default)]
    pub size: u64,
}

impl UpdateManifest {
    /// Parse and validate a feed response.
    pub fn from_json(body: &str) -> Result<Self, UpdateError> {
        let manifest: UpdateManifest =
            serde_json::from_str(body).map_err(|e| UpdateError::Parse(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// A manifest is usable only with a version and at least one file.
    pub fn validate(&self) -> Result<(), UpdateError> {
        if self.version.trim().is_empty() {
            return Err(UpdateError::Parse("missing version".into()));
        }
        if self.files.is_empty() {
            return Err(UpdateError::Parse("no files listed".into()));
        }
        if let Some(file) = self.files.iter().find(|f| f.url.trim().is_empty()) {
            return Err(UpdateError::Parse(format!(
                "file entry without url (sha512 {})",
                file.sha512
            )));
        }
        Ok(())
    }

    /// The file that gets downloaded: the first one listed.
    pub fn primary_file(&self) -> Option<&UpdateFile> {
        self.files.first()
    }
}
