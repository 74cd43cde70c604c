//! Game installation boundary.
//!
//! The store and catalog only ever ask the installation three things: is it
//! present, where is it, and where does each asset kind live inside it. The
//! install root belongs to the game; this library never touches anything
//! outside the per-kind storage folders.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::asset::AssetKind;
use crate::config::Config;

/// A handle to the external game installation.
///
/// Detection is a plain directory-exists check. Storage folders are created
/// on demand the first time an asset of that kind is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInstallation {
    /// Root directory of the game installation.
    root: PathBuf,
}

impl GameInstallation {
    /// Create a handle for the given install root.
    ///
    /// # Arguments
    ///
    /// * `root` - The game's install directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a handle from the configured install directory.
    ///
    /// Returns `None` when no install directory has been configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        config.game.install_dir.as_ref().map(Self::new)
    }

    /// Check whether the install root exists on disk.
    pub fn is_installed(&self) -> bool {
        self.root.is_dir()
    }

    /// Get the game's install root.
    pub fn installation_path(&self) -> &Path {
        &self.root
    }

    /// Directory holding installed mods.
    pub fn mods_path(&self) -> PathBuf {
        self.storage_path(AssetKind::Mod)
    }

    /// Directory holding installed blueprint files.
    pub fn blueprints_path(&self) -> PathBuf {
        self.storage_path(AssetKind::Blueprint)
    }

    /// Directory holding installed savegame files.
    pub fn savegames_path(&self) -> PathBuf {
        self.storage_path(AssetKind::Savegame)
    }

    /// Storage directory for the given asset kind.
    pub fn storage_path(&self, kind: AssetKind) -> PathBuf {
        self.root.join(kind.storage_folder())
    }

    /// Storage directory for the given asset kind, created if absent.
    pub fn ensure_storage_path(&self, kind: AssetKind) -> io::Result<PathBuf> {
        let path = self.storage_path(kind);
        if !path.is_dir() {
            fs::create_dir_all(&path)?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_installed() {
        let temp = TempDir::new().unwrap();
        let game = GameInstallation::new(temp.path());
        assert!(game.is_installed());

        let missing = GameInstallation::new(temp.path().join("nope"));
        assert!(!missing.is_installed());
    }

    #[test]
    fn test_storage_paths_per_kind() {
        let game = GameInstallation::new("/opt/game");

        assert_eq!(game.mods_path(), PathBuf::from("/opt/game/Mods"));
        assert_eq!(
            game.blueprints_path(),
            PathBuf::from("/opt/game/Blueprints")
        );
        assert_eq!(game.savegames_path(), PathBuf::from("/opt/game/Saves"));
    }

    #[test]
    fn test_ensure_storage_path_creates_directory() {
        let temp = TempDir::new().unwrap();
        let game = GameInstallation::new(temp.path());

        let mods = game.ensure_storage_path(AssetKind::Mod).unwrap();
        assert!(mods.is_dir());
        assert_eq!(mods, temp.path().join("Mods"));

        // Second call is a no-op
        let again = game.ensure_storage_path(AssetKind::Mod).unwrap();
        assert_eq!(again, mods);
    }

    #[test]
    fn test_from_config_requires_install_dir() {
        let config = Config::default();
        assert!(GameInstallation::from_config(&config).is_none());

        let mut configured = Config::default();
        configured.game.install_dir = Some(PathBuf::from("/opt/game"));
        let game = GameInstallation::from_config(&configured).unwrap();
        assert_eq!(game.installation_path(), Path::new("/opt/game"));
    }
}
