//! Asset variants and installed-asset records.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of installable asset variants.
///
/// Adding a variant here is a compile-checked obligation at every match
/// site: storage-folder resolution, store dispatch, and update queries all
/// match exhaustively rather than falling through on a type tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// A single blueprint file.
    Blueprint,
    /// A single savegame file.
    Savegame,
    /// A directory of files plus a `mod.json` manifest.
    Mod,
}

impl AssetKind {
    /// Storage folder for this kind, relative to the game install root.
    pub fn storage_folder(&self) -> &'static str {
        match self {
            AssetKind::Blueprint => "Blueprints",
            AssetKind::Savegame => "Saves",
            AssetKind::Mod => "Mods",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Blueprint => "blueprint",
            AssetKind::Savegame => "savegame",
            AssetKind::Mod => "mod",
        };
        write!(f, "{}", name)
    }
}

/// Error returned when parsing an unrecognized asset kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized asset kind {0:?} (expected blueprint, savegame or mod)")]
pub struct UnknownAssetKind(pub String);

impl FromStr for AssetKind {
    type Err = UnknownAssetKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blueprint" => Ok(AssetKind::Blueprint),
            "savegame" => Ok(AssetKind::Savegame),
            "mod" => Ok(AssetKind::Mod),
            _ => Err(UnknownAssetKind(s.to_string())),
        }
    }
}

/// An installed plain-file asset (blueprint or savegame).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAsset {
    /// File name, unique within the storage folder.
    pub id: String,
    /// Full path to the installed file.
    pub path: PathBuf,
}

/// An installed mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModAsset {
    /// Folder name, unique within the mods directory.
    pub id: String,
    /// Human-readable name from the manifest.
    pub name: String,
    /// Remote source identity, e.g. "owner/name". Absent for local mods.
    pub repository: Option<String>,
    /// Installed version label. Compared for equality only, never ordered.
    pub tag: Option<String>,
    /// Whether the game should load this mod.
    pub enabled: bool,
    /// Development mods are local work-in-progress and never version-tracked.
    pub development: bool,
    /// Full path to the installed mod's root directory.
    pub path: PathBuf,
}

impl ModAsset {
    /// Whether this mod participates in update tracking.
    ///
    /// Requires a repository identity and excludes development mods.
    pub fn is_tracked(&self) -> bool {
        self.repository.is_some() && !self.development
    }
}

/// An installed asset of any variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    Blueprint(FileAsset),
    Savegame(FileAsset),
    Mod(ModAsset),
}

impl Asset {
    /// The variant of this asset.
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Blueprint(_) => AssetKind::Blueprint,
            Asset::Savegame(_) => AssetKind::Savegame,
            Asset::Mod(_) => AssetKind::Mod,
        }
    }

    /// Stable identity, unique within the variant.
    pub fn id(&self) -> &str {
        match self {
            Asset::Blueprint(file) | Asset::Savegame(file) => &file.id,
            Asset::Mod(module) => &module.id,
        }
    }

    /// On-disk root of the installed asset.
    pub fn path(&self) -> &Path {
        match self {
            Asset::Blueprint(file) | Asset::Savegame(file) => &file.path,
            Asset::Mod(module) => &module.path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_folder_per_kind() {
        assert_eq!(AssetKind::Blueprint.storage_folder(), "Blueprints");
        assert_eq!(AssetKind::Savegame.storage_folder(), "Saves");
        assert_eq!(AssetKind::Mod.storage_folder(), "Mods");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(AssetKind::Blueprint.to_string(), "blueprint");
        assert_eq!(AssetKind::Savegame.to_string(), "savegame");
        assert_eq!(AssetKind::Mod.to_string(), "mod");
    }

    #[test]
    fn test_kind_from_str_case_insensitive() {
        assert_eq!("blueprint".parse::<AssetKind>(), Ok(AssetKind::Blueprint));
        assert_eq!("Savegame".parse::<AssetKind>(), Ok(AssetKind::Savegame));
        assert_eq!("MOD".parse::<AssetKind>(), Ok(AssetKind::Mod));
    }

    #[test]
    fn test_kind_from_str_unknown() {
        let err = "texture".parse::<AssetKind>().unwrap_err();
        assert_eq!(err, UnknownAssetKind("texture".to_string()));
        assert!(err.to_string().contains("texture"));
    }

    #[test]
    fn test_mod_is_tracked() {
        let mut asset = ModAsset {
            id: "acme_signals".to_string(),
            name: "Signals".to_string(),
            repository: Some("acme/signals".to_string()),
            tag: Some("v1".to_string()),
            enabled: true,
            development: false,
            path: PathBuf::from("/game/Mods/acme_signals"),
        };
        assert!(asset.is_tracked());

        asset.development = true;
        assert!(!asset.is_tracked());

        asset.development = false;
        asset.repository = None;
        assert!(!asset.is_tracked());
    }

    #[test]
    fn test_asset_accessors_dispatch_by_variant() {
        let blueprint = Asset::Blueprint(FileAsset {
            id: "bridge.bp".to_string(),
            path: PathBuf::from("/game/Blueprints/bridge.bp"),
        });
        assert_eq!(blueprint.kind(), AssetKind::Blueprint);
        assert_eq!(blueprint.id(), "bridge.bp");
        assert_eq!(blueprint.path(), Path::new("/game/Blueprints/bridge.bp"));

        let module = Asset::Mod(ModAsset {
            id: "acme_signals".to_string(),
            name: "Signals".to_string(),
            repository: None,
            tag: None,
            enabled: true,
            development: true,
            path: PathBuf::from("/game/Mods/acme_signals"),
        });
        assert_eq!(module.kind(), AssetKind::Mod);
        assert_eq!(module.id(), "acme_signals");
    }
}
