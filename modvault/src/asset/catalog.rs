//! Catalog for discovering installed assets.

use std::fs;
use std::path::PathBuf;

use super::manifest::{ModManifest, MANIFEST_FILENAME};
use super::types::{Asset, AssetKind, FileAsset, ModAsset};
use crate::game::GameInstallation;

/// Error enumerating installed assets.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A storage directory exists but could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of installed mods for update tracking.
///
/// Abstracted so the tracker can be driven by a fixed mod list in tests.
pub trait ModInventory: Send + Sync {
    /// List every installed mod.
    fn installed_mods(&self) -> Result<Vec<ModAsset>, CatalogError>;
}

/// Catalog of assets installed in a game installation.
///
/// A mod is any directory in the mods folder carrying a parsable `mod.json`.
/// Directories without one (including dot-prefixed staging leftovers) are
/// skipped; a malformed manifest is logged and skipped rather than failing
/// the whole listing.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    game: GameInstallation,
}

impl AssetCatalog {
    /// Create a catalog over the given game installation.
    pub fn new(game: GameInstallation) -> Self {
        Self { game }
    }

    /// The game installation this catalog reads from.
    pub fn game(&self) -> &GameInstallation {
        &self.game
    }

    /// List all installed mods, sorted by folder name.
    pub fn list_mods(&self) -> Result<Vec<ModAsset>, CatalogError> {
        let root = self.game.mods_path();
        let mut mods = Vec::new();

        if !root.is_dir() {
            return Ok(mods);
        }

        let entries = fs::read_dir(&root).map_err(|e| CatalogError::ReadFailed {
            path: root.clone(),
            source: e,
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let manifest_path = path.join(MANIFEST_FILENAME);
            if !manifest_path.exists() {
                continue;
            }

            let bytes = match fs::read(&manifest_path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(
                        "Skipping unreadable manifest {}: {}",
                        manifest_path.display(),
                        e
                    );
                    continue;
                }
            };

            match ModManifest::from_slice(&bytes) {
                Ok(manifest) => mods.push(mod_asset_from_manifest(manifest, path)),
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed manifest {}: {}",
                        manifest_path.display(),
                        e
                    );
                }
            }
        }

        mods.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(mods)
    }

    /// Find the installed mod with the given repository identity, if any.
    pub fn find_mod_by_repository(
        &self,
        repository: &str,
    ) -> Result<Option<ModAsset>, CatalogError> {
        let mods = self.list_mods()?;
        Ok(mods
            .into_iter()
            .find(|m| m.repository.as_deref() == Some(repository)))
    }

    /// List installed blueprint files, sorted by name.
    pub fn list_blueprints(&self) -> Result<Vec<FileAsset>, CatalogError> {
        self.list_plain_files(AssetKind::Blueprint)
    }

    /// List installed savegame files, sorted by name.
    pub fn list_savegames(&self) -> Result<Vec<FileAsset>, CatalogError> {
        self.list_plain_files(AssetKind::Savegame)
    }

    /// List everything installed: blueprints, then savegames, then mods.
    pub fn list_all(&self) -> Result<Vec<Asset>, CatalogError> {
        let mut assets: Vec<Asset> = Vec::new();
        assets.extend(self.list_blueprints()?.into_iter().map(Asset::Blueprint));
        assets.extend(self.list_savegames()?.into_iter().map(Asset::Savegame));
        assets.extend(self.list_mods()?.into_iter().map(Asset::Mod));
        Ok(assets)
    }

    fn list_plain_files(&self, kind: AssetKind) -> Result<Vec<FileAsset>, CatalogError> {
        let root = self.game.storage_path(kind);
        let mut files = Vec::new();

        if !root.is_dir() {
            return Ok(files);
        }

        let entries = fs::read_dir(&root).map_err(|e| CatalogError::ReadFailed {
            path: root.clone(),
            source: e,
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            files.push(FileAsset { id: name, path });
        }

        files.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(files)
    }
}

impl ModInventory for AssetCatalog {
    fn installed_mods(&self) -> Result<Vec<ModAsset>, CatalogError> {
        self.list_mods()
    }
}

fn mod_asset_from_manifest(manifest: ModManifest, path: PathBuf) -> ModAsset {
    // The real directory name wins over whatever the manifest recorded.
    let id = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| manifest.path.clone());
    let name = if manifest.name.is_empty() {
        id.clone()
    } else {
        manifest.name
    };

    ModAsset {
        id,
        name,
        repository: manifest.repository,
        tag: manifest.tag,
        enabled: manifest.is_enabled,
        development: manifest.is_development,
        path,
    }
}
