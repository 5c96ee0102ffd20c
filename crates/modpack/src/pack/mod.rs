//! Modpack install pipeline
//!
//! This module contains the whole pipeline: manifest parsing, loader
//! resolution, pack acquisition, override materialization, asset downloads
//! and the lifecycle tying them together.

pub mod assets;
pub mod config;
pub mod error;
pub mod http;
pub mod installer;
pub mod lifecycle;
pub mod loader;
pub mod manifest;
pub mod overrides;
pub mod progress;
pub mod source;
pub mod workspace;

// Re-export main types for convenience
pub use assets::{AssetReport, AssetWarning};
pub use config::InstallConfig;
pub use error::{FileOperation, PackError, Result};
pub use installer::{NullRuntimeInstaller, RuntimeInstallRequest, RuntimeInstaller};
pub use lifecycle::{InstallOptions, InstallReport, ModPack};
pub use loader::{LoaderKind, LoaderSpec};
pub use manifest::{AssetEntry, LoaderDecl, NormalizedManifest, Provider};
pub use progress::{ByteCallback, ByteEvent, InstallStage, Progress, StepCallback, StepEvent};
pub use source::{PackLocation, PackSource};
pub use workspace::Workspace;
