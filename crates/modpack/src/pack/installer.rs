//! Base/loader installer boundary
//!
//! Installing the base game runtime and patching in the loader is the job of
//! an external collaborator. The pipeline only decides *what* to install and
//! hands over this request; implementations may be long-running and report
//! through the same progress channels as the rest of the install.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::pack::loader::{LoaderKind, LoaderSpec};
use crate::pack::progress::Progress;

/// What the base installer is asked to set up
#[derive(Debug, Clone)]
pub struct RuntimeInstallRequest {
    /// Target base game version from the manifest
    pub game_version: String,
    /// Resolved loader requirement
    pub loader: LoaderSpec,
    /// The install target directory
    pub install_dir: PathBuf,
}

/// External collaborator that installs the base runtime and loader.
///
/// Returns the installed version identifier used to build the launch
/// command. Errors are opaque to the pipeline and surface as
/// `BaseInstallFailed`.
#[async_trait]
pub trait RuntimeInstaller: Send + Sync {
    async fn install(
        &self,
        request: &RuntimeInstallRequest,
        progress: &Progress,
    ) -> anyhow::Result<String>;
}

/// Installer that performs no runtime work and returns the version
/// identifier the requested loader would conventionally produce.
///
/// Useful when the runtime is managed elsewhere and only the pack contents
/// (overrides and assets) should be materialized.
#[derive(Debug, Default)]
pub struct NullRuntimeInstaller;

#[async_trait]
impl RuntimeInstaller for NullRuntimeInstaller {
    async fn install(
        &self,
        request: &RuntimeInstallRequest,
        _progress: &Progress,
    ) -> anyhow::Result<String> {
        let version = request.loader.version.as_deref().unwrap_or_default();
        Ok(match request.loader.kind {
            LoaderKind::Forge => {
                format!("{}-forge-{}", request.game_version, version)
            }
            LoaderKind::Fabric => {
                format!("fabric-loader-{}-{}", version, request.game_version)
            }
            LoaderKind::None => request.game_version.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::loader::LoaderKind;

    #[tokio::test]
    async fn null_installer_names_versions() {
        let installer = NullRuntimeInstaller;
        let request = RuntimeInstallRequest {
            game_version: "1.20.1".to_string(),
            loader: LoaderSpec {
                kind: LoaderKind::Forge,
                version: Some("47.2.0".to_string()),
            },
            install_dir: PathBuf::from("/tmp/instance"),
        };
        let version = installer
            .install(&request, &Progress::none())
            .await
            .unwrap();
        assert_eq!(version, "1.20.1-forge-47.2.0");
    }
}
