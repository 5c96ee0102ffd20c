//! Override materialization
//!
//! Files bundled under the manifest's overrides root are copied verbatim to
//! the same relative paths under the install target. The archive contents
//! are immutable once extracted, so the file list is fixed at call time and
//! copies can run concurrently without coordination: every copy owns its own
//! destination path, and parent-directory creation is idempotent.

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::pack::config::InstallConfig;
use crate::pack::error::{FileOperation, PackError, Result};
use crate::pack::progress::{InstallStage, Progress, StepEvent};

/// Copy every file under `<workspace_root>/<overrides_dir>` into `target`.
///
/// A missing overrides root is not an error; it yields zero copies. Returns
/// the number of files copied.
pub(crate) async fn materialize(
    workspace_root: &Path,
    overrides_dir: &str,
    target: &Path,
    config: &InstallConfig,
    progress: &Progress,
    cancel: &CancellationToken,
) -> Result<usize> {
    let root = workspace_root.join(overrides_dir);
    if !fs::try_exists(&root).await.unwrap_or(false) {
        debug!("no overrides directory at {}", root.display());
        return Ok(0);
    }

    let files = collect_files(&root).await?;
    let total = files.len();
    progress.step(StepEvent::StageStarted {
        stage: InstallStage::Overrides,
        total,
    });

    let results: Vec<Result<()>> = stream::iter(files.into_iter().enumerate())
        .map(|(index, (src, rel))| async move {
            if cancel.is_cancelled() {
                return Err(PackError::Cancelled { stage: "overrides" });
            }
            let dest = target.join(&rel);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| PackError::FileSystem {
                        path: parent.to_path_buf(),
                        operation: FileOperation::CreateDir,
                        source: e,
                    })?;
            }
            fs::copy(&src, &dest)
                .await
                .map_err(|e| PackError::FileSystem {
                    path: dest.clone(),
                    operation: FileOperation::Write,
                    source: e,
                })?;
            debug!("override {} -> {}", rel.display(), dest.display());
            progress.step(StepEvent::StepCompleted {
                stage: InstallStage::Overrides,
                name: rel.display().to_string(),
                index,
                total,
            });
            Ok(())
        })
        .buffer_unordered(config.max_concurrent_copies.max(1))
        .collect()
        .await;

    for result in results {
        result?;
    }

    progress.step(StepEvent::StageFinished {
        stage: InstallStage::Overrides,
    });
    Ok(total)
}

/// Recursively list files under `root` as (absolute, root-relative) pairs
async fn collect_files(root: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await.map_err(|e| PackError::FileSystem {
            path: dir.clone(),
            operation: FileOperation::Read,
            source: e,
        })?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| PackError::FileSystem {
            path: dir.clone(),
            operation: FileOperation::Read,
            source: e,
        })? {
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(|e| PackError::FileSystem {
                path: path.clone(),
                operation: FileOperation::Metadata,
                source: e,
            })?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                if let Ok(rel) = path.strip_prefix(root) {
                    let rel = rel.to_path_buf();
                    files.push((path, rel));
                }
            }
        }
    }

    Ok(files)
}
