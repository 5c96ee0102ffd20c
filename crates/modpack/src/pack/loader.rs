//! Loader resolution
//!
//! Unifies the two manifest encodings of "which loader does this pack need"
//! into a single kind + version pair for the external base installer.

use crate::pack::error::{PackError, Result};
use crate::pack::manifest::{LoaderDecl, NormalizedManifest};

/// Loader variant a pack targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderKind {
    Forge,
    Fabric,
    /// Base game only, no loader step
    None,
}

impl LoaderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoaderKind::Forge => "forge",
            LoaderKind::Fabric => "fabric",
            LoaderKind::None => "none",
        }
    }
}

impl std::fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved loader requirement handed to the base installer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSpec {
    pub kind: LoaderKind,
    /// Loader version; `None` only when `kind` is [`LoaderKind::None`]
    pub version: Option<String>,
}

/// Resolve a manifest's loader declaration into a concrete spec.
///
/// Primary-descriptor form: the identifier prefix picks the kind, the suffix
/// is the version; an unrecognized prefix is unsupported. Version-field
/// form: exactly one of the forge/fabric fields must be present; both is
/// ambiguous, neither is unsupported.
pub fn resolve(manifest: &NormalizedManifest) -> Result<LoaderSpec> {
    match &manifest.loader {
        LoaderDecl::Primary { id } => {
            if let Some(version) = id.strip_prefix("forge-") {
                Ok(LoaderSpec {
                    kind: LoaderKind::Forge,
                    version: Some(version.to_string()),
                })
            } else if let Some(version) = id.strip_prefix("fabric-") {
                Ok(LoaderSpec {
                    kind: LoaderKind::Fabric,
                    version: Some(version.to_string()),
                })
            } else {
                Err(PackError::UnsupportedLoader { id: id.clone() })
            }
        }
        LoaderDecl::Versions { forge, fabric } => match (forge, fabric) {
            (Some(_), Some(_)) => Err(PackError::AmbiguousLoader),
            (Some(version), None) => Ok(LoaderSpec {
                kind: LoaderKind::Forge,
                version: Some(version.clone()),
            }),
            (None, Some(version)) => Ok(LoaderSpec {
                kind: LoaderKind::Fabric,
                version: Some(version.clone()),
            }),
            (None, None) => Err(PackError::UnsupportedLoader {
                id: "none".to_string(),
            }),
        },
        LoaderDecl::None => Ok(LoaderSpec {
            kind: LoaderKind::None,
            version: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::manifest::Provider;

    fn manifest_with(loader: LoaderDecl) -> NormalizedManifest {
        NormalizedManifest {
            provider: Provider::CurseForge,
            name: "Test".to_string(),
            version: "1.0".to_string(),
            game_version: "1.20.1".to_string(),
            loader,
            recommended_ram_mb: 512,
            overrides_dir: "overrides".to_string(),
            assets: Vec::new(),
        }
    }

    #[test]
    fn primary_forge_descriptor() {
        let manifest = manifest_with(LoaderDecl::Primary {
            id: "forge-47.2.0".to_string(),
        });
        let spec = resolve(&manifest).unwrap();
        assert_eq!(spec.kind, LoaderKind::Forge);
        assert_eq!(spec.version.as_deref(), Some("47.2.0"));
    }

    #[test]
    fn primary_fabric_descriptor() {
        let manifest = manifest_with(LoaderDecl::Primary {
            id: "fabric-0.14.21".to_string(),
        });
        let spec = resolve(&manifest).unwrap();
        assert_eq!(spec.kind, LoaderKind::Fabric);
        assert_eq!(spec.version.as_deref(), Some("0.14.21"));
    }

    #[test]
    fn unknown_prefix_is_unsupported() {
        let manifest = manifest_with(LoaderDecl::Primary {
            id: "quilt-0.21.0".to_string(),
        });
        let err = resolve(&manifest).unwrap_err();
        assert!(matches!(err, PackError::UnsupportedLoader { id } if id == "quilt-0.21.0"));
    }

    #[test]
    fn fabric_version_field() {
        let manifest = manifest_with(LoaderDecl::Versions {
            forge: None,
            fabric: Some("0.15.0".to_string()),
        });
        let spec = resolve(&manifest).unwrap();
        assert_eq!(spec.kind, LoaderKind::Fabric);
        assert_eq!(spec.version.as_deref(), Some("0.15.0"));
    }

    #[test]
    fn forge_version_field() {
        let manifest = manifest_with(LoaderDecl::Versions {
            forge: Some("47.2.0".to_string()),
            fabric: None,
        });
        let spec = resolve(&manifest).unwrap();
        assert_eq!(spec.kind, LoaderKind::Forge);
        assert_eq!(spec.version.as_deref(), Some("47.2.0"));
    }

    #[test]
    fn both_fields_is_ambiguous() {
        let manifest = manifest_with(LoaderDecl::Versions {
            forge: Some("47.2.0".to_string()),
            fabric: Some("0.15.0".to_string()),
        });
        assert!(matches!(
            resolve(&manifest).unwrap_err(),
            PackError::AmbiguousLoader
        ));
    }

    #[test]
    fn neither_field_is_unsupported() {
        let manifest = manifest_with(LoaderDecl::Versions {
            forge: None,
            fabric: None,
        });
        assert!(matches!(
            resolve(&manifest).unwrap_err(),
            PackError::UnsupportedLoader { .. }
        ));
    }

    #[test]
    fn explicit_none_resolves_to_base_game() {
        let manifest = manifest_with(LoaderDecl::None);
        let spec = resolve(&manifest).unwrap();
        assert_eq!(spec.kind, LoaderKind::None);
        assert_eq!(spec.version, None);
    }
}
