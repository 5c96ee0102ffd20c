//! Modrinth `modrinth.index.json` codec

use serde::Deserialize;

use crate::pack::error::{PackError, Result};
use crate::pack::manifest::{AssetEntry, LoaderDecl, NormalizedManifest, Provider};

/// Modrinth has no recommended-memory field; this matches the launcher default.
const DEFAULT_RAM_MB: u32 = 1024;

/// Raw `modrinth.index.json` structure as it appears in the archive
#[derive(Debug, Deserialize)]
pub struct ModrinthIndex {
    pub name: String,
    #[serde(rename = "versionId")]
    pub version_id: String,
    #[serde(default)]
    pub files: Vec<ModrinthFile>,
    pub dependencies: Dependencies,
}

#[derive(Debug, Deserialize)]
pub struct Dependencies {
    pub minecraft: String,
    pub forge: Option<String>,
    // The published format spells this `fabric-loader`; older packs in the
    // wild use the underscore form.
    #[serde(rename = "fabric-loader", alias = "fabric_loader")]
    pub fabric_loader: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModrinthFile {
    /// Destination relative to the install root, e.g. `mods/sodium.jar`
    pub path: String,
    #[serde(default)]
    pub hashes: Option<Hashes>,
    #[serde(default)]
    pub env: Option<Env>,
    pub downloads: Vec<String>,
    #[serde(rename = "fileSize", default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Hashes {
    pub sha1: Option<String>,
    pub sha512: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Env {
    /// "required" / "optional" / "unsupported"
    pub client: Option<String>,
    pub server: Option<String>,
}

/// Parse raw `modrinth.index.json` bytes into the normalized model
pub fn parse(raw: &[u8]) -> Result<NormalizedManifest> {
    let index: ModrinthIndex =
        serde_json::from_slice(raw).map_err(|e| PackError::ManifestInvalid {
            reason: format!("modrinth.index.json: {e}"),
        })?;

    if index.name.is_empty() {
        return Err(PackError::ManifestInvalid {
            reason: "missing pack name".to_string(),
        });
    }

    let mut assets = Vec::with_capacity(index.files.len());
    for file in &index.files {
        if file.downloads.is_empty() {
            return Err(PackError::ManifestInvalid {
                reason: format!("file entry '{}' has no download URLs", file.path),
            });
        }
        assets.push(AssetEntry {
            required: is_required(file.env.as_ref()),
            urls: file.downloads.clone(),
            destination: file.path.clone(),
            size: file.file_size,
            sha1: file
                .hashes
                .as_ref()
                .and_then(|h| h.sha1.as_ref())
                .map(|h| h.to_ascii_lowercase()),
        });
    }

    Ok(NormalizedManifest {
        provider: Provider::Modrinth,
        name: index.name,
        version: index.version_id,
        game_version: index.dependencies.minecraft,
        loader: LoaderDecl::Versions {
            forge: index.dependencies.forge,
            fabric: index.dependencies.fabric_loader,
        },
        recommended_ram_mb: DEFAULT_RAM_MB,
        // The Modrinth format fixes the overrides directory name
        overrides_dir: "overrides".to_string(),
        assets,
    })
}

/// Entries not marked client-required are attempted but allowed to fail
fn is_required(env: Option<&Env>) -> bool {
    match env.and_then(|e| e.client.as_deref()) {
        Some("required") | None => true,
        _ => false,
    }
}
