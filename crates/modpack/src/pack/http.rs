//! Streaming HTTP downloads
//!
//! One configured client shared across the whole pipeline. Downloads stream
//! to a `.part` file in the destination directory and are renamed into place
//! once complete, so a crash mid-transfer never leaves a partial file at the
//! final path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::pack::config::InstallConfig;
use crate::pack::error::{FileOperation, PackError, Result};
use crate::pack::progress::Progress;

/// HTTP client with streaming download support
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &InstallConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(PackError::from)?;
        Ok(Self { client })
    }

    /// Stream `url` into `dest`, creating parent directories as needed.
    ///
    /// The body is written to a sibling `.part` file and moved into place on
    /// completion. If the destination appeared while the transfer ran, the
    /// existing file wins and the temp file is discarded. Returns the number
    /// of bytes transferred.
    pub async fn download_to_file(
        &self,
        url: &str,
        dest: &Path,
        progress: &Progress,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        debug!("downloading {} -> {}", url, dest.display());

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PackError::FileSystem {
                    path: parent.to_path_buf(),
                    operation: FileOperation::CreateDir,
                    source: e,
                })?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PackError::HttpRequest {
                url: url.to_string(),
                source: e,
            })?;

        let total = response.content_length();
        progress.bytes(0, total);

        let temp_path = part_path(dest);
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| PackError::FileSystem {
                path: temp_path.clone(),
                operation: FileOperation::Create,
                source: e,
            })?;

        let mut stream = response.bytes_stream();
        let mut transferred = 0u64;
        let mut last_report = Instant::now();

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => {
                    drop(file);
                    let _ = fs::remove_file(&temp_path).await;
                    return Err(PackError::Cancelled { stage: "download" });
                }
                next = stream.next() => next,
            };
            let Some(chunk) = next else { break };
            let chunk = chunk.map_err(|e| PackError::HttpRequest {
                url: url.to_string(),
                source: e,
            })?;

            file.write_all(&chunk)
                .await
                .map_err(|e| PackError::FileSystem {
                    path: temp_path.clone(),
                    operation: FileOperation::Write,
                    source: e,
                })?;
            transferred += chunk.len() as u64;

            // Report at most every 100ms to keep callback overhead bounded
            if last_report.elapsed().as_millis() >= 100 {
                progress.bytes(transferred, total);
                last_report = Instant::now();
            }
        }

        file.flush().await.map_err(|e| PackError::FileSystem {
            path: temp_path.clone(),
            operation: FileOperation::Write,
            source: e,
        })?;
        drop(file);

        if fs::try_exists(dest).await.unwrap_or(false) {
            // A concurrent writer already produced the destination; the
            // existing file is authoritative.
            let _ = fs::remove_file(&temp_path).await;
            progress.bytes(transferred, total);
            return Ok(transferred);
        }

        fs::rename(&temp_path, dest)
            .await
            .map_err(|e| PackError::FileSystem {
                path: dest.to_path_buf(),
                operation: FileOperation::Move,
                source: e,
            })?;

        progress.bytes(transferred, total);
        debug!("downloaded {} bytes to {}", transferred, dest.display());
        Ok(transferred)
    }
}

/// Temp path for an in-flight download, next to its destination
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("download"));
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_path_appends_suffix() {
        let dest = Path::new("/tmp/mods/example-1.2.jar");
        assert_eq!(part_path(dest), Path::new("/tmp/mods/example-1.2.jar.part"));
    }
}
