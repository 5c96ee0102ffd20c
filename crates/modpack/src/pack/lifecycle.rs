//! Pack lifecycle: load, install, dispose
//!
//! A [`ModPack`] moves `Unloaded → Loaded → Installed` on success, or ends
//! in `Failed` when any stage errors. `dispose` is valid from every state
//! and idempotent. Stages inside `install` are strictly sequential: the base
//! runtime and loader are installed before overrides are applied, and
//! overrides land before assets, because overrides may place files that mods
//! expect to already be on disk.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::pack::assets::{self, AssetWarning};
use crate::pack::config::InstallConfig;
use crate::pack::error::{FileOperation, PackError, Result};
use crate::pack::http::HttpClient;
use crate::pack::installer::{RuntimeInstallRequest, RuntimeInstaller};
use crate::pack::loader;
use crate::pack::manifest::{self, NormalizedManifest};
use crate::pack::overrides;
use crate::pack::progress::{InstallStage, Progress, StepEvent};
use crate::pack::source::{PackLocation, PackSource};
use crate::pack::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Unloaded,
    Loaded,
    Installed,
    Failed,
    Disposed,
}

impl LifecycleState {
    fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Unloaded => "unloaded",
            LifecycleState::Loaded => "loaded",
            LifecycleState::Installed => "installed",
            LifecycleState::Failed => "failed",
            LifecycleState::Disposed => "disposed",
        }
    }
}

/// Options for a single install run
pub struct InstallOptions {
    /// Directory that becomes the game root; created if absent
    pub target_dir: PathBuf,
    pub progress: Progress,
    pub cancel: CancellationToken,
}

impl InstallOptions {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            progress: Progress::none(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// What a successful install produced
#[derive(Debug)]
pub struct InstallReport {
    /// Version identifier returned by the base installer
    pub installed_version: String,
    pub overrides_copied: usize,
    pub assets_downloaded: usize,
    /// Assets whose destinations already existed
    pub assets_skipped: usize,
    /// Optional-asset failures that did not abort the install
    pub warnings: Vec<AssetWarning>,
}

/// A modpack moving through load, install and disposal.
pub struct ModPack {
    location: PackLocation,
    config: InstallConfig,
    http: HttpClient,
    state: LifecycleState,
    source: Option<PackSource>,
    workspace: Option<Workspace>,
    manifest: Option<NormalizedManifest>,
}

impl ModPack {
    pub fn new(location: PackLocation) -> Result<Self> {
        Self::with_config(location, InstallConfig::default())
    }

    pub fn with_config(location: PackLocation, config: InstallConfig) -> Result<Self> {
        let http = HttpClient::new(&config)?;
        Ok(Self {
            location,
            config,
            http,
            state: LifecycleState::Unloaded,
            source: None,
            workspace: None,
            manifest: None,
        })
    }

    /// Acquire the archive, extract it into a fresh workspace, and parse the
    /// manifest. The only transition out of `Unloaded`.
    pub async fn load(&mut self) -> Result<()> {
        self.load_with(&Progress::none(), &CancellationToken::new())
            .await
    }

    /// [`load`](Self::load) with progress reporting and cancellation.
    pub async fn load_with(
        &mut self,
        progress: &Progress,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if self.state != LifecycleState::Unloaded {
            return Err(PackError::InvalidLifecycleState {
                expected: "unloaded",
                actual: self.state.as_str(),
            });
        }

        match self.try_load(progress, cancel).await {
            Ok(()) => {
                self.state = LifecycleState::Loaded;
                Ok(())
            }
            Err(e) => {
                warn!(category = e.category(), "pack load failed: {e}");
                self.state = LifecycleState::Failed;
                Err(e)
            }
        }
    }

    async fn try_load(&mut self, progress: &Progress, cancel: &CancellationToken) -> Result<()> {
        let source = PackSource::acquire(&self.location, &self.http, progress, cancel).await?;

        progress.step(StepEvent::StageStarted {
            stage: InstallStage::Extract,
            total: 1,
        });
        let workspace = Workspace::extract(source.archive_path()).await?;
        progress.step(StepEvent::StageFinished {
            stage: InstallStage::Extract,
        });

        // Keep the workspace reachable before parsing so a failed parse still
        // leaves something for dispose to clean up.
        let root = workspace.root().to_path_buf();
        self.source = Some(source);
        self.workspace = Some(workspace);

        let parsed = manifest::parse_from_workspace(&root).await?;
        info!(
            "loaded {} pack '{}' {} (game {})",
            parsed.provider, parsed.name, parsed.version, parsed.game_version
        );
        self.manifest = Some(parsed);
        Ok(())
    }

    /// The parsed manifest, available once loaded
    pub fn manifest(&self) -> Option<&NormalizedManifest> {
        self.manifest.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.manifest.as_ref().map(|m| m.name.as_str())
    }

    pub fn version(&self) -> Option<&str> {
        self.manifest.as_ref().map(|m| m.version.as_str())
    }

    pub fn game_version(&self) -> Option<&str> {
        self.manifest.as_ref().map(|m| m.game_version.as_str())
    }

    pub fn recommended_ram_mb(&self) -> Option<u32> {
        self.manifest.as_ref().map(|m| m.recommended_ram_mb)
    }

    /// Conventional per-pack directory name, `<name>_<version>`
    pub fn install_dir_name(&self) -> Option<String> {
        self.manifest
            .as_ref()
            .map(|m| format!("{}_{}", m.name, m.version))
    }

    /// The extraction workspace directory, while one exists
    pub fn workspace_dir(&self) -> Option<&Path> {
        self.workspace.as_ref().map(|w| w.root())
    }

    /// Run the install pipeline against `options.target_dir`.
    ///
    /// Requires the `Loaded` state; a repeated install on the same instance
    /// is rejected. Sequences loader resolution, the external base install,
    /// override materialization and asset downloads; a base-install failure
    /// stops the later stages from running. Any failure leaves the target
    /// partially populated but re-runnable.
    pub async fn install(
        &mut self,
        runtime: &dyn RuntimeInstaller,
        options: &InstallOptions,
    ) -> Result<InstallReport> {
        if self.state != LifecycleState::Loaded {
            return Err(PackError::InvalidLifecycleState {
                expected: "loaded",
                actual: self.state.as_str(),
            });
        }

        match self.try_install(runtime, options).await {
            Ok(report) => {
                self.state = LifecycleState::Installed;
                Ok(report)
            }
            Err(e) => {
                warn!(category = e.category(), "pack install failed: {e}");
                self.state = LifecycleState::Failed;
                Err(e)
            }
        }
    }

    async fn try_install(
        &self,
        runtime: &dyn RuntimeInstaller,
        options: &InstallOptions,
    ) -> Result<InstallReport> {
        let manifest = self
            .manifest
            .as_ref()
            .ok_or(PackError::InvalidLifecycleState {
                expected: "loaded",
                actual: self.state.as_str(),
            })?;
        let workspace = self
            .workspace
            .as_ref()
            .ok_or(PackError::InvalidLifecycleState {
                expected: "loaded",
                actual: self.state.as_str(),
            })?;

        let target = &options.target_dir;
        tokio::fs::create_dir_all(target)
            .await
            .map_err(|e| PackError::FileSystem {
                path: target.clone(),
                operation: FileOperation::CreateDir,
                source: e,
            })?;

        let spec = loader::resolve(manifest)?;
        info!(
            "installing '{}' into {}: game {}, loader {} {}",
            manifest.name,
            target.display(),
            manifest.game_version,
            spec.kind,
            spec.version.as_deref().unwrap_or("-"),
        );

        if options.cancel.is_cancelled() {
            return Err(PackError::Cancelled {
                stage: "base-install",
            });
        }
        options.progress.step(StepEvent::StageStarted {
            stage: InstallStage::BaseInstall,
            total: 1,
        });
        let request = RuntimeInstallRequest {
            game_version: manifest.game_version.clone(),
            loader: spec.clone(),
            install_dir: target.clone(),
        };
        let installed_version = runtime
            .install(&request, &options.progress)
            .await
            .map_err(|e| PackError::BaseInstallFailed {
                game_version: manifest.game_version.clone(),
                loader: spec.kind.to_string(),
                source: e.into(),
            })?;
        options.progress.step(StepEvent::StageFinished {
            stage: InstallStage::BaseInstall,
        });

        if options.cancel.is_cancelled() {
            return Err(PackError::Cancelled { stage: "overrides" });
        }
        let overrides_copied = overrides::materialize(
            workspace.root(),
            &manifest.overrides_dir,
            target,
            &self.config,
            &options.progress,
            &options.cancel,
        )
        .await?;

        if options.cancel.is_cancelled() {
            return Err(PackError::Cancelled { stage: "assets" });
        }
        let asset_report = assets::download_all(
            &manifest.assets,
            target,
            &self.http,
            &self.config,
            &options.progress,
            &options.cancel,
        )
        .await?;

        info!(
            "install complete: version {}, {} overrides, {} assets downloaded, {} skipped, {} warnings",
            installed_version,
            overrides_copied,
            asset_report.downloaded,
            asset_report.skipped,
            asset_report.warnings.len(),
        );

        Ok(InstallReport {
            installed_version,
            overrides_copied,
            assets_downloaded: asset_report.downloaded,
            assets_skipped: asset_report.skipped,
            warnings: asset_report.warnings,
        })
    }

    /// Release the workspace and any downloaded archive.
    ///
    /// Valid from every state and idempotent. Cleanup failures are logged
    /// and swallowed so they never mask the primary operation's outcome.
    pub async fn dispose(&mut self) {
        if let Some(workspace) = self.workspace.take() {
            workspace.close();
        }
        if let Some(source) = self.source.take() {
            source.close();
        }
        self.manifest = None;
        self.state = LifecycleState::Disposed;
    }
}
