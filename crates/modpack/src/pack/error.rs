//! Error types for the modpack install pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by pack loading and installation.
///
/// Every variant is fatal to the current operation. Optional-asset failures
/// are deliberately not represented here; they are collected as warnings in
/// the install report instead.
#[derive(Debug, Error)]
pub enum PackError {
    /// The pack archive could not be acquired or read
    #[error("pack source '{location}' unavailable")]
    SourceUnavailable {
        location: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No recognized manifest file at the archive root
    #[error("no manifest found in archive (expected {expected})")]
    ManifestNotFound { expected: &'static str },

    /// A manifest was found but required fields are missing or malformed
    #[error("invalid manifest: {reason}")]
    ManifestInvalid { reason: String },

    /// The manifest declares a loader this pipeline does not handle
    #[error("unsupported loader '{id}'")]
    UnsupportedLoader { id: String },

    /// The manifest declares more than one loader at once
    #[error("manifest declares both a forge and a fabric loader version")]
    AmbiguousLoader,

    /// An operation was called in the wrong lifecycle state
    #[error("operation requires the pack to be {expected}, but it is {actual}")]
    InvalidLifecycleState {
        expected: &'static str,
        actual: &'static str,
    },

    /// A required asset failed on every candidate URL
    #[error("required asset '{destination}' unavailable after {candidates} candidate URL(s): {reason}")]
    RequiredAssetUnavailable {
        destination: String,
        candidates: usize,
        reason: String,
    },

    /// The external base/loader installer reported a failure
    #[error("base install failed for {game_version} with loader {loader}")]
    BaseInstallFailed {
        game_version: String,
        loader: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A manifest-supplied path resolves outside the install directory
    #[error("path '{path}' escapes the install directory")]
    PathEscape { path: String },

    /// The caller's cancellation token fired mid-operation
    #[error("cancelled during {stage}")]
    Cancelled { stage: &'static str },

    /// HTTP-level failure with the offending URL
    #[error("HTTP request to '{url}' failed")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// File system I/O failure with file context
    #[error("failed {operation} {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// Archive could not be decoded
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// File operation kinds used for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
    Move,
    Metadata,
    CreateDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Move => write!(f, "moving"),
            FileOperation::Metadata => write!(f, "reading metadata of"),
            FileOperation::CreateDir => write!(f, "creating directory"),
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;

impl PackError {
    /// Error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            PackError::SourceUnavailable { .. } => "source_unavailable",
            PackError::ManifestNotFound { .. } => "manifest_not_found",
            PackError::ManifestInvalid { .. } => "manifest_invalid",
            PackError::UnsupportedLoader { .. } => "unsupported_loader",
            PackError::AmbiguousLoader => "ambiguous_loader",
            PackError::InvalidLifecycleState { .. } => "invalid_lifecycle_state",
            PackError::RequiredAssetUnavailable { .. } => "required_asset_unavailable",
            PackError::BaseInstallFailed { .. } => "base_install_failed",
            PackError::PathEscape { .. } => "path_escape",
            PackError::Cancelled { .. } => "cancelled",
            PackError::HttpRequest { .. } => "http_request",
            PackError::FileSystem { .. } => "file_system",
            PackError::Archive(_) => "archive",
        }
    }
}

impl From<std::io::Error> for PackError {
    fn from(source: std::io::Error) -> Self {
        PackError::FileSystem {
            path: PathBuf::new(),
            operation: FileOperation::Read,
            source,
        }
    }
}

impl From<reqwest::Error> for PackError {
    fn from(source: reqwest::Error) -> Self {
        let url = source
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        PackError::HttpRequest { url, source }
    }
}
