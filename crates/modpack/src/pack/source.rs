//! Pack acquisition
//!
//! A pack archive comes either from a local path or from a remote URL. A
//! remote archive is streamed into a temp directory owned by the resulting
//! [`PackSource`], so the file lives exactly as long as the handle.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::pack::error::{PackError, Result};
use crate::pack::http::HttpClient;
use crate::pack::progress::{InstallStage, Progress, StepEvent};

/// Where a pack archive comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackLocation {
    Local(PathBuf),
    Remote(String),
}

impl PackLocation {
    /// Interpret a string as a URL when it carries an http(s) scheme,
    /// otherwise as a local path.
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            PackLocation::Remote(input.to_string())
        } else {
            PackLocation::Local(PathBuf::from(input))
        }
    }
}

impl std::fmt::Display for PackLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackLocation::Local(path) => write!(f, "{}", path.display()),
            PackLocation::Remote(url) => f.write_str(url),
        }
    }
}

/// Handle to a readable pack archive.
///
/// Owns the temp directory holding a downloaded archive; local archives are
/// referenced in place.
pub struct PackSource {
    archive_path: PathBuf,
    temp: Option<TempDir>,
}

impl PackSource {
    /// Acquire the archive, downloading it first for remote locations.
    pub async fn acquire(
        location: &PackLocation,
        http: &HttpClient,
        progress: &Progress,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        progress.step(StepEvent::StageStarted {
            stage: InstallStage::Acquire,
            total: 1,
        });

        let source = match location {
            PackLocation::Local(path) => {
                let meta = tokio::fs::metadata(path).await.map_err(|e| {
                    PackError::SourceUnavailable {
                        location: path.display().to_string(),
                        source: Some(Box::new(e)),
                    }
                })?;
                if !meta.is_file() {
                    return Err(PackError::SourceUnavailable {
                        location: path.display().to_string(),
                        source: None,
                    });
                }
                Self {
                    archive_path: path.clone(),
                    temp: None,
                }
            }
            PackLocation::Remote(url) => {
                let temp = tempfile::Builder::new()
                    .prefix("modpack-archive-")
                    .tempdir()
                    .map_err(|e| PackError::SourceUnavailable {
                        location: url.clone(),
                        source: Some(Box::new(e)),
                    })?;
                let dest = temp.path().join(archive_filename(url)?);
                debug!("fetching pack archive {} -> {}", url, dest.display());
                http.download_to_file(url, &dest, progress, cancel)
                    .await
                    .map_err(|e| match e {
                        PackError::Cancelled { .. } => e,
                        other => PackError::SourceUnavailable {
                            location: url.clone(),
                            source: Some(Box::new(other)),
                        },
                    })?;
                Self {
                    archive_path: dest,
                    temp: Some(temp),
                }
            }
        };

        progress.step(StepEvent::StageFinished {
            stage: InstallStage::Acquire,
        });
        Ok(source)
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Remove the owned temp archive, best-effort.
    pub fn close(mut self) {
        if let Some(temp) = self.temp.take() {
            if let Err(e) = temp.close() {
                warn!("failed to remove downloaded archive: {e}");
            }
        }
    }
}

/// Archive filename derived from the final URL path segment
fn archive_filename(url: &str) -> Result<String> {
    let parsed = url::Url::parse(url).map_err(|e| PackError::SourceUnavailable {
        location: url.to_string(),
        source: Some(Box::new(e)),
    })?;
    let name = parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("modpack.zip");
    Ok(name.to_string())
}
