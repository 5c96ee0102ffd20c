//! Asset downloads
//!
//! Fetches every manifest asset into the install target with bounded
//! concurrency. Destinations that already exist are skipped, which makes
//! re-running an interrupted install cheap. Candidate URLs are tried in
//! order; an entry only fails once every candidate has been exhausted.
//! Required-entry failures abort the install after the whole batch has
//! settled, optional-entry failures become warnings.

use std::path::{Component, Path, PathBuf};

use futures::stream::{self, StreamExt};
use sha1::{Digest, Sha1};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::pack::config::InstallConfig;
use crate::pack::error::{PackError, Result};
use crate::pack::http::HttpClient;
use crate::pack::manifest::AssetEntry;
use crate::pack::progress::{InstallStage, Progress, StepEvent};

/// A non-fatal asset failure reported alongside a successful install
#[derive(Debug, Clone)]
pub struct AssetWarning {
    pub destination: String,
    pub reason: String,
}

/// Outcome of the asset stage
#[derive(Debug, Default)]
pub struct AssetReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub warnings: Vec<AssetWarning>,
}

enum Outcome {
    Downloaded,
    Skipped,
    Failed {
        required: bool,
        destination: String,
        candidates: usize,
        reason: String,
    },
}

/// Download all `entries` into `target`.
///
/// Entry failures never cancel sibling downloads; the batch always runs to
/// completion (or cancellation) before a required failure is surfaced, so
/// completed files stay in place for a re-run.
pub(crate) async fn download_all(
    entries: &[AssetEntry],
    target: &Path,
    http: &HttpClient,
    config: &InstallConfig,
    progress: &Progress,
    cancel: &CancellationToken,
) -> Result<AssetReport> {
    let total = entries.len();
    progress.step(StepEvent::StageStarted {
        stage: InstallStage::Assets,
        total,
    });

    let results: Vec<Result<Outcome>> = stream::iter(entries.iter().enumerate())
        .map(|(index, entry)| async move {
            fetch_entry(entry, index, total, target, http, progress, cancel).await
        })
        .buffer_unordered(config.max_concurrent_downloads.max(1))
        .collect()
        .await;

    let mut report = AssetReport::default();
    let mut required_failure: Option<PackError> = None;

    for result in results {
        match result? {
            Outcome::Downloaded => report.downloaded += 1,
            Outcome::Skipped => report.skipped += 1,
            Outcome::Failed {
                required,
                destination,
                candidates,
                reason,
            } => {
                if required {
                    required_failure.get_or_insert(PackError::RequiredAssetUnavailable {
                        destination,
                        candidates,
                        reason,
                    });
                } else {
                    progress.step(StepEvent::Warning {
                        stage: InstallStage::Assets,
                        message: format!("optional asset '{destination}' failed: {reason}"),
                    });
                    report.warnings.push(AssetWarning {
                        destination,
                        reason,
                    });
                }
            }
        }
    }

    if let Some(err) = required_failure {
        return Err(err);
    }

    progress.step(StepEvent::StageFinished {
        stage: InstallStage::Assets,
    });
    Ok(report)
}

async fn fetch_entry(
    entry: &AssetEntry,
    index: usize,
    total: usize,
    target: &Path,
    http: &HttpClient,
    progress: &Progress,
    cancel: &CancellationToken,
) -> Result<Outcome> {
    let dest = resolve_destination(target, &entry.destination)?;

    if cancel.is_cancelled() {
        return Err(PackError::Cancelled { stage: "assets" });
    }

    if fs::try_exists(&dest).await.unwrap_or(false) {
        debug!("asset already present: {}", entry.destination);
        progress.step(StepEvent::StepCompleted {
            stage: InstallStage::Assets,
            name: entry.destination.clone(),
            index,
            total,
        });
        return Ok(Outcome::Skipped);
    }

    let mut last_reason = String::new();
    for url in &entry.urls {
        match http.download_to_file(url, &dest, progress, cancel).await {
            Ok(_) => match verify(entry, &dest).await {
                Ok(()) => {
                    progress.step(StepEvent::StepCompleted {
                        stage: InstallStage::Assets,
                        name: entry.destination.clone(),
                        index,
                        total,
                    });
                    return Ok(Outcome::Downloaded);
                }
                Err(reason) => {
                    warn!("asset '{}' from {} failed verification: {reason}", entry.destination, url);
                    let _ = fs::remove_file(&dest).await;
                    last_reason = reason;
                }
            },
            Err(e @ PackError::Cancelled { .. }) => return Err(e),
            Err(e) => {
                debug!("candidate {} for '{}' failed: {e}", url, entry.destination);
                last_reason = e.to_string();
            }
        }
    }

    Ok(Outcome::Failed {
        required: entry.required,
        destination: entry.destination.clone(),
        candidates: entry.urls.len(),
        reason: last_reason,
    })
}

/// Verify a downloaded file against the entry's best-effort size and hash
async fn verify(entry: &AssetEntry, path: &Path) -> std::result::Result<(), String> {
    if let Some(expected) = entry.size {
        let actual = fs::metadata(path)
            .await
            .map_err(|e| format!("failed to read metadata: {e}"))?
            .len();
        if actual != expected {
            return Err(format!("size mismatch: expected {expected}, got {actual}"));
        }
    }

    if let Some(ref expected) = entry.sha1 {
        let bytes = fs::read(path)
            .await
            .map_err(|e| format!("failed to read back file: {e}"))?;
        let mut hasher = Sha1::new();
        hasher.update(&bytes);
        let actual = hex::encode(hasher.finalize());
        if &actual != expected {
            return Err(format!("sha1 mismatch: expected {expected}, got {actual}"));
        }
    }

    Ok(())
}

/// Join a manifest-supplied relative path onto the install target, rejecting
/// anything that would resolve outside it.
fn resolve_destination(target: &Path, destination: &str) -> Result<PathBuf> {
    let relative = Path::new(destination);
    if relative.is_absolute() {
        return Err(PackError::PathEscape {
            path: destination.to_string(),
        });
    }

    let mut clean = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => {
                return Err(PackError::PathEscape {
                    path: destination.to_string(),
                });
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(PackError::PathEscape {
            path: destination.to_string(),
        });
    }

    Ok(target.join(clean))
}
