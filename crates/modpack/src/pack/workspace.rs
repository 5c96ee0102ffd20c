//! Extraction workspace
//!
//! The archive is unpacked into an exclusively-owned temp directory that
//! lives for the duration of the install and is removed unconditionally at
//! disposal, error paths included. Entry paths are validated so a crafted
//! archive cannot write outside the workspace.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::pack::error::{FileOperation, PackError, Result};

/// Exclusively-owned temporary directory holding extracted archive contents
#[derive(Debug)]
pub struct Workspace {
    root: TempDir,
}

impl Workspace {
    /// Extract `archive_path` into a fresh temp directory.
    ///
    /// Decoding runs on the blocking pool; entries are streamed to disk so
    /// large archives are never held in memory whole.
    pub async fn extract(archive_path: &Path) -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix("modpack-ws-")
            .tempdir()
            .map_err(|e| PackError::FileSystem {
                path: PathBuf::new(),
                operation: FileOperation::CreateDir,
                source: e,
            })?;

        let archive = archive_path.to_path_buf();
        let dest = root.path().to_path_buf();
        tokio::task::spawn_blocking(move || extract_zip(&archive, &dest))
            .await
            .map_err(|e| PackError::FileSystem {
                path: archive_path.to_path_buf(),
                operation: FileOperation::Read,
                source: io::Error::other(e),
            })??;

        debug!(
            "extracted {} into {}",
            archive_path.display(),
            root.path().display()
        );
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Delete the workspace now, best-effort. Dropping the value has the
    /// same effect; this variant logs failures.
    pub fn close(self) {
        let path = self.root.path().to_path_buf();
        if let Err(e) = self.root.close() {
            warn!("failed to remove workspace {}: {e}", path.display());
        }
    }
}

fn extract_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(archive_path).map_err(|e| PackError::SourceUnavailable {
        location: archive_path.display().to_string(),
        source: Some(Box::new(e)),
    })?;
    let mut archive = zip::ZipArchive::new(file)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;

        // Rejects absolute paths and `..` components (zip-slip)
        let Some(relative) = entry.enclosed_name() else {
            return Err(PackError::PathEscape {
                path: entry.name().to_string(),
            });
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| PackError::FileSystem {
                path: out_path,
                operation: FileOperation::CreateDir,
                source: e,
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PackError::FileSystem {
                path: parent.to_path_buf(),
                operation: FileOperation::CreateDir,
                source: e,
            })?;
        }

        let mut out = std::fs::File::create(&out_path).map_err(|e| PackError::FileSystem {
            path: out_path.clone(),
            operation: FileOperation::Create,
            source: e,
        })?;
        io::copy(&mut entry, &mut out).map_err(|e| PackError::FileSystem {
            path: out_path,
            operation: FileOperation::Write,
            source: e,
        })?;
    }

    Ok(())
}
