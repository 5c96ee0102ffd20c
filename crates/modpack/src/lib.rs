//! Modpack Installer Library
//!
//! Installs packaged modpacks (zip archives carrying a manifest, bundled
//! override files, and references to remote mod assets) into a runnable
//! game directory. Two manifest schemas (CurseForge `manifest.json` and
//! Modrinth `modrinth.index.json`) are unified behind one normalized model;
//! the base runtime and loader installation is delegated to a caller-supplied
//! [`RuntimeInstaller`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use modpack::{InstallOptions, ModPack, NullRuntimeInstaller, PackLocation};
//!
//! # async fn example() -> modpack::Result<()> {
//! // Local path or http(s) URL; remote archives are downloaded to a temp file
//! let mut pack = ModPack::new(PackLocation::parse("packs/example.mrpack"))?;
//!
//! // Extracts the archive and parses the manifest
//! pack.load().await?;
//! println!(
//!     "pack {} {} for game {}",
//!     pack.name().unwrap_or("?"),
//!     pack.version().unwrap_or("?"),
//!     pack.game_version().unwrap_or("?"),
//! );
//!
//! // Resolve the loader, run the base install, copy overrides, fetch assets
//! let options = InstallOptions::new("instances/example");
//! let report = pack.install(&NullRuntimeInstaller, &options).await?;
//! println!(
//!     "installed version {} ({} assets, {} warnings)",
//!     report.installed_version,
//!     report.assets_downloaded,
//!     report.warnings.len(),
//! );
//!
//! pack.dispose().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Two manifest codecs**: CurseForge and Modrinth schemas normalized
//!   into one provider-agnostic model, selected by content sniffing
//! - **Loader resolution**: forge/fabric kind and version unified from both
//!   manifest encodings
//! - **Idempotent installs**: existing files are skipped, so a failed or
//!   cancelled install is recovered by re-running
//! - **Partial-failure tolerance**: optional asset failures become warnings
//!   instead of aborting the install
//! - **Bounded concurrency**: override copies and asset downloads fan out
//!   under configurable caps, with cooperative cancellation
//! - **Progress channels**: separate discrete-step and byte-count sinks

pub mod pack;

// Re-export commonly used types for convenience
pub use pack::{
    AssetEntry, AssetWarning, ByteCallback, ByteEvent, InstallConfig, InstallOptions,
    InstallReport, InstallStage, LoaderDecl, LoaderKind, LoaderSpec, ModPack,
    NormalizedManifest, NullRuntimeInstaller, PackError, PackLocation, Progress, Provider,
    Result, RuntimeInstallRequest, RuntimeInstaller, StepCallback, StepEvent,
};
