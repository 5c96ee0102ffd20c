//! Manifest parsing
//!
//! Two incompatible manifest schemas are supported, selected by sniffing the
//! extracted archive contents: CurseForge packs carry `manifest.json` at the
//! archive root, Modrinth packs carry `modrinth.index.json`. Each provider
//! has its own codec, a serde model plus a pure mapping function, and both
//! produce the same [`NormalizedManifest`].

pub mod curseforge;
pub mod modrinth;

use std::path::Path;

use crate::pack::error::{FileOperation, PackError, Result};

/// Supported pack providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    CurseForge,
    Modrinth,
}

impl Provider {
    /// Manifest file name at the archive root for this provider
    pub fn manifest_file(&self) -> &'static str {
        match self {
            Provider::CurseForge => "manifest.json",
            Provider::Modrinth => "modrinth.index.json",
        }
    }

    /// Guess the provider from an archive file extension.
    ///
    /// `.mrpack` archives are Modrinth packs, `.zip` archives are CurseForge
    /// packs. Content sniffing via [`sniff_provider`] remains authoritative;
    /// this is a convenience for callers choosing a default.
    pub fn guess_from_extension(path: &Path) -> Option<Provider> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("mrpack") {
            Some(Provider::Modrinth)
        } else if ext.eq_ignore_ascii_case("zip") {
            Some(Provider::CurseForge)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::CurseForge => write!(f, "curseforge"),
            Provider::Modrinth => write!(f, "modrinth"),
        }
    }
}

/// Raw loader declaration carried by a manifest.
///
/// The two schemas encode the loader differently: CurseForge embeds a
/// prefixed identifier (`forge-<version>` / `fabric-<version>`) in a list of
/// descriptors with a primary flag, Modrinth exposes per-loader version
/// fields. Resolution to a concrete kind and version happens in
/// [`crate::pack::loader::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderDecl {
    /// Primary-flagged descriptor identifier, e.g. `forge-47.2.0`
    Primary { id: String },
    /// Direct optional version fields
    Versions {
        forge: Option<String>,
        fabric: Option<String>,
    },
    /// The pack runs on the base game with no loader step
    None,
}

/// One remote asset referenced by the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Whether a failed download aborts the install
    pub required: bool,
    /// Candidate download URLs, first success wins
    pub urls: Vec<String>,
    /// Destination path relative to the install root
    pub destination: String,
    /// Expected size in bytes, when the provider supplies one
    pub size: Option<u64>,
    /// Expected SHA-1 as lowercase hex, when the provider supplies one
    pub sha1: Option<String>,
}

/// Provider-agnostic projection of a pack manifest.
///
/// Immutable once parsed; every later stage reads from this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedManifest {
    pub provider: Provider,
    pub name: String,
    pub version: String,
    /// Target base game version
    pub game_version: String,
    pub loader: LoaderDecl,
    /// Recommended memory in MB
    pub recommended_ram_mb: u32,
    /// Overrides directory relative to the archive root
    pub overrides_dir: String,
    pub assets: Vec<AssetEntry>,
}

/// Determine the provider from the extracted archive contents
pub fn sniff_provider(workspace_root: &Path) -> Result<Provider> {
    if workspace_root
        .join(Provider::CurseForge.manifest_file())
        .is_file()
    {
        Ok(Provider::CurseForge)
    } else if workspace_root
        .join(Provider::Modrinth.manifest_file())
        .is_file()
    {
        Ok(Provider::Modrinth)
    } else {
        Err(PackError::ManifestNotFound {
            expected: "manifest.json or modrinth.index.json",
        })
    }
}

/// Sniff and parse the manifest from an extracted archive
pub async fn parse_from_workspace(workspace_root: &Path) -> Result<NormalizedManifest> {
    let provider = sniff_provider(workspace_root)?;
    let path = workspace_root.join(provider.manifest_file());
    let raw = tokio::fs::read(&path)
        .await
        .map_err(|e| PackError::FileSystem {
            path,
            operation: FileOperation::Read,
            source: e,
        })?;
    match provider {
        Provider::CurseForge => curseforge::parse(&raw),
        Provider::Modrinth => modrinth::parse(&raw),
    }
}
