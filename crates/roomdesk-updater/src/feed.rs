//! Where manifests and update payloads come from.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine as _;
use futures_util::StreamExt;
use sha2::{Digest, Sha512};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::UpdateError;
use crate::machine::DownloadProgress;
use crate::manifest::UpdateManifest;
use crate::settings::UpdaterSettings;

/// Progress callback invoked from the download task.
pub type ProgressFn = Box<dyn Fn(DownloadProgress) + Send + Sync>;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// A verified update payload on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedUpdate {
    pub version: String,
    pub path: PathBuf,
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and validate the latest manifest.
    async fn fetch_manifest(&self) -> Result<UpdateManifest, UpdateError>;

    /// Download the manifest's primary file into `dest_dir` and verify it.
    async fn download(
        &self,
        manifest: &UpdateManifest,
        dest_dir: &Path,
        on_progress: ProgressFn,
    ) -> Result<DownloadedUpdate, UpdateError>;
}

/// The generic HTTP feed: `<feed_url>/<feed document>` plus file downloads.
pub struct HttpFeed {
    client: reqwest::Client,
    settings: UpdaterSettings,
}

impl HttpFeed {
    pub fn new(settings: UpdaterSettings) -> Result<Self, UpdateError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("roomdesk-updater/{}", settings.current_version))
            .build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch_manifest(&self) -> Result<UpdateManifest, UpdateError> {
        let url = self.settings.manifest_url();
        debug!(%url, "Fetching update manifest");

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpdateError::Network(format!(
                "{url} returned {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        UpdateManifest::from_json(&body)
    }

    async fn download(
        &self,
        manifest: &UpdateManifest,
        dest_dir: &Path,
        on_progress: ProgressFn,
    ) -> Result<DownloadedUpdate, UpdateError> {
        let file = manifest
            .primary_file()
            .ok_or_else(|| UpdateError::Parse("no files listed".into()))?;
        let url = self.settings.resolve_file_url(&file.url);

        tokio::fs::create_dir_all(dest_dir).await?;
        let final_path = dest_dir.join(file_name_from_url(&url));
        let mut part_path = final_path.clone().into_os_string();
        part_path.push(".part");
        let part_path = PathBuf::from(part_path);

        info!(%url, path = %final_path.display(), "Downloading update");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(UpdateError::Network(format!(
                "{url} returned {}",
                response.status()
            )));
        }

        let total = if file.size > 0 {
            file.size
        } else {
            response.content_length().unwrap_or(0)
        };

        let result = stream_to_file(response, &part_path, total, &on_progress).await;
        let (transferred, digest) = match result {
            Ok(done) => done,
            Err(e) => {
                let _ = tokio::fs::remove_file(&part_path).await;
                return Err(e);
            }
        };

        if let Err(e) = verify(file.size, &file.sha512, transferred, &digest) {
            warn!(path = %part_path.display(), error = %e, "Discarding unverified download");
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e);
        }

        tokio::fs::rename(&part_path, &final_path).await?;
        Ok(DownloadedUpdate {
            version: manifest.version.clone(),
            path: final_path,
        })
    }
}

async fn stream_to_file(
    response: reqwest::Response,
    path: &Path,
    total: u64,
    on_progress: &ProgressFn,
) -> Result<(u64, Vec<u8>), UpdateError> {
    let mut out = tokio::fs::File::create(path).await?;
    let mut hasher = Sha512::new();
    let mut stream = response.bytes_stream();

    let started = Instant::now();
    let mut last_report = started;
    let mut transferred: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        hasher.update(&chunk);
        out.write_all(&chunk).await?;
        transferred += chunk.len() as u64;

        if last_report.elapsed() >= PROGRESS_INTERVAL {
            last_report = Instant::now();
            on_progress(progress(transferred, total, started.elapsed()));
        }
    }
    out.flush().await?;
    on_progress(progress(transferred, total, started.elapsed()));

    Ok((transferred, hasher.finalize().to_vec()))
}

fn progress(transferred: u64, total: u64, elapsed: Duration) -> DownloadProgress {
    let percent = if total > 0 {
        (transferred as f64 / total as f64 * 100.0).min(100.0)
    } else {
        0.0
    };
    let secs = elapsed.as_secs_f64();
    let bytes_per_second = if secs > 0.0 {
        (transferred as f64 / secs) as u64
    } else {
        transferred
    };
    DownloadProgress {
        percent,
        transferred,
        total,
        bytes_per_second,
    }
}

/// Check declared size (when non-zero) and sha512.
pub fn verify(expected_size: u64, expected_sha512: &str, size: u64, digest: &[u8]) -> Result<(), UpdateError> {
    if expected_size > 0 && size != expected_size {
        return Err(UpdateError::Integrity(format!(
            "size {size} does not match declared {expected_size}"
        )));
    }
    if !sha512_matches(digest, expected_sha512) {
        return Err(UpdateError::Integrity("sha512 mismatch".into()));
    }
    Ok(())
}

/// Compare a digest against a base64 or hex rendering.
pub fn sha512_matches(digest: &[u8], expected: &str) -> bool {
    let expected = expected.trim();
    if let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(expected) {
        if decoded == digest {
            return true;
        }
    }
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex.eq_ignore_ascii_case(expected)
}

fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .map(sanitize_file_name)
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .unwrap_or_else(|| "update.bin".to_string())
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '%'))
        .collect()
}
