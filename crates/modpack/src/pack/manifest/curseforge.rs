//! CurseForge `manifest.json` codec

use serde::Deserialize;

use crate::pack::error::{PackError, Result};
use crate::pack::manifest::{AssetEntry, LoaderDecl, NormalizedManifest, Provider};

/// Raw `manifest.json` structure as it appears in the archive
#[derive(Debug, Deserialize)]
pub struct CurseForgeManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub minecraft: MinecraftSection,
    pub overrides: Option<String>,
    #[serde(default)]
    pub files: Vec<CurseForgeFile>,
}

#[derive(Debug, Deserialize)]
pub struct MinecraftSection {
    pub version: String,
    #[serde(rename = "modLoaders", default)]
    pub mod_loaders: Vec<ModLoaderEntry>,
    #[serde(rename = "recommendedRam", default = "default_ram")]
    pub recommended_ram: u32,
}

#[derive(Debug, Deserialize)]
pub struct ModLoaderEntry {
    pub id: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Deserialize)]
pub struct CurseForgeFile {
    #[serde(rename = "projectID")]
    pub project_id: u32,
    #[serde(rename = "fileID")]
    pub file_id: u32,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_ram() -> u32 {
    512
}

fn default_required() -> bool {
    true
}

/// Parse raw `manifest.json` bytes into the normalized model
pub fn parse(raw: &[u8]) -> Result<NormalizedManifest> {
    let manifest: CurseForgeManifest =
        serde_json::from_slice(raw).map_err(|e| PackError::ManifestInvalid {
            reason: format!("manifest.json: {e}"),
        })?;

    let name = manifest
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| PackError::ManifestInvalid {
            reason: "missing pack name".to_string(),
        })?;

    let primary = manifest
        .minecraft
        .mod_loaders
        .iter()
        .find(|loader| loader.primary)
        .ok_or_else(|| PackError::ManifestInvalid {
            reason: "no primary mod loader".to_string(),
        })?;

    let assets = manifest
        .files
        .iter()
        .map(|file| AssetEntry {
            required: file.required,
            urls: vec![download_url(file.project_id, file.file_id)],
            destination: format!("mods/{}-{}.jar", file.project_id, file.file_id),
            size: None,
            sha1: None,
        })
        .collect();

    Ok(NormalizedManifest {
        provider: Provider::CurseForge,
        name,
        version: manifest.version.unwrap_or_else(|| "Unknown".to_string()),
        game_version: manifest.minecraft.version,
        loader: LoaderDecl::Primary {
            id: primary.id.clone(),
        },
        recommended_ram_mb: manifest.minecraft.recommended_ram,
        overrides_dir: manifest
            .overrides
            .unwrap_or_else(|| "overrides".to_string()),
        assets,
    })
}

/// CurseForge direct-download URL for a project file
fn download_url(project_id: u32, file_id: u32) -> String {
    format!("https://www.curseforge.com/api/v1/mods/{project_id}/files/{file_id}/download")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "name": "Test Pack",
        "version": "1.4.2",
        "minecraft": {
            "version": "1.20.1",
            "modLoaders": [
                { "id": "forge-47.2.0", "primary": true }
            ],
            "recommendedRam": 4096
        },
        "overrides": "overrides",
        "files": [
            { "projectID": 238222, "fileID": 4712345, "required": true },
            { "projectID": 248787, "fileID": 4609121, "required": false }
        ]
    }"#;

    #[test]
    fn parses_fixture() {
        let manifest = parse(FIXTURE.as_bytes()).unwrap();
        assert_eq!(manifest.provider, Provider::CurseForge);
        assert_eq!(manifest.name, "Test Pack");
        assert_eq!(manifest.version, "1.4.2");
        assert_eq!(manifest.game_version, "1.20.1");
        assert_eq!(manifest.recommended_ram_mb, 4096);
        assert_eq!(manifest.overrides_dir, "overrides");
        assert_eq!(
            manifest.loader,
            LoaderDecl::Primary {
                id: "forge-47.2.0".to_string()
            }
        );

        assert_eq!(manifest.assets.len(), 2);
        let first = &manifest.assets[0];
        assert!(first.required);
        assert_eq!(first.destination, "mods/238222-4712345.jar");
        assert_eq!(
            first.urls,
            vec!["https://www.curseforge.com/api/v1/mods/238222/files/4712345/download"]
        );
        assert!(!manifest.assets[1].required);
    }

    #[test]
    fn parsing_is_deterministic() {
        let a = parse(FIXTURE.as_bytes()).unwrap();
        let b = parse(FIXTURE.as_bytes()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn defaults_apply() {
        let json = r#"{
            "name": "Minimal",
            "minecraft": {
                "version": "1.19.2",
                "modLoaders": [{ "id": "fabric-0.15.0", "primary": true }]
            }
        }"#;
        let manifest = parse(json.as_bytes()).unwrap();
        assert_eq!(manifest.version, "Unknown");
        assert_eq!(manifest.recommended_ram_mb, 512);
        assert_eq!(manifest.overrides_dir, "overrides");
        assert!(manifest.assets.is_empty());
    }

    #[test]
    fn missing_name_is_invalid() {
        let json = r#"{
            "minecraft": {
                "version": "1.20.1",
                "modLoaders": [{ "id": "forge-47.2.0", "primary": true }]
            }
        }"#;
        let err = parse(json.as_bytes()).unwrap_err();
        assert!(matches!(err, PackError::ManifestInvalid { .. }));
    }

    #[test]
    fn missing_primary_loader_is_invalid() {
        let json = r#"{
            "name": "No Loader",
            "minecraft": {
                "version": "1.20.1",
                "modLoaders": [{ "id": "forge-47.2.0", "primary": false }]
            }
        }"#;
        let err = parse(json.as_bytes()).unwrap_err();
        assert!(matches!(err, PackError::ManifestInvalid { .. }));
    }

    #[test]
    fn malformed_json_is_invalid() {
        let err = parse(b"{ not json").unwrap_err();
        assert!(matches!(err, PackError::ManifestInvalid { .. }));
    }
}
