//! The asset store: commits downloaded artifacts to the game directory.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::archive::ModArchive;
use crate::asset::{
    repository_folder_name, AssetCatalog, AssetKind, ModAsset, ModManifest, MANIFEST_FILENAME,
};
use crate::digest;
use crate::game::GameInstallation;

use super::artifact::Artifact;
use super::error::{StoreError, StoreResult};
use super::hooks::InstallHooks;

/// Successful result of a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The artifact was written to a new location.
    Installed { path: PathBuf },
    /// Byte-identical content was already present; nothing was written.
    AlreadyInstalled { path: PathBuf },
    /// An older install of the same mod was swapped out.
    Replaced {
        path: PathBuf,
        previous_tag: Option<String>,
    },
}

impl StoreOutcome {
    /// Path of the installed (or already-present) asset.
    pub fn path(&self) -> &Path {
        match self {
            StoreOutcome::Installed { path }
            | StoreOutcome::AlreadyInstalled { path }
            | StoreOutcome::Replaced { path, .. } => path,
        }
    }

    /// Whether the call changed anything on disk.
    pub fn changed(&self) -> bool {
        !matches!(self, StoreOutcome::AlreadyInstalled { .. })
    }
}

/// Store for committing downloaded artifacts into the game installation.
///
/// Plain-file artifacts (blueprints, savegames) are deduplicated by content
/// digest and disambiguated with ` (2)`, ` (3)`, ... suffixes when distinct
/// content shares a name. Mod archives install as a whole directory with a
/// rewritten manifest; replacing an older version stages the new tree next
/// to the old one and swaps it in with renames, so no mixed file set is
/// ever visible.
///
/// Install attempts for the same destination serialize on a per-path lock;
/// the existence check and the write are one critical section.
pub struct AssetStore<H: InstallHooks> {
    game: GameInstallation,
    hooks: H,
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl<H: InstallHooks> AssetStore<H> {
    /// Create a store for the given game installation.
    pub fn new(game: GameInstallation, hooks: H) -> Self {
        Self {
            game,
            hooks,
            locks: DashMap::new(),
        }
    }

    /// The game installation this store writes into.
    pub fn game(&self) -> &GameInstallation {
        &self.game
    }

    /// Commit an artifact to durable storage.
    ///
    /// Dispatches on the artifact's kind: blueprints and savegames follow
    /// the plain-file flow, mod archives the replace/install flow. Requires
    /// a detected game installation.
    pub async fn store(&self, artifact: Artifact) -> StoreResult<StoreOutcome> {
        if !self.game.is_installed() {
            return Err(StoreError::NotInstalled {
                path: self.game.installation_path().to_path_buf(),
            });
        }

        match artifact.kind {
            AssetKind::Blueprint | AssetKind::Savegame => self.store_plain_file(artifact).await,
            AssetKind::Mod => self.store_mod_archive(artifact).await,
        }
    }

    // ===== Plain files =====

    async fn store_plain_file(&self, artifact: Artifact) -> StoreResult<StoreOutcome> {
        let file_name = sanitized_file_name(&artifact.file_name)
            .ok_or_else(|| StoreError::InvalidFileName {
                name: artifact.file_name.clone(),
            })?
            .to_string();

        let dir = self
            .game
            .ensure_storage_path(artifact.kind)
            .map_err(|e| StoreError::Io {
                path: self.game.storage_path(artifact.kind),
                source: e,
            })?;
        let base = dir.join(&file_name);

        // Existence check and write are one critical section per destination.
        let lock = self.destination_lock(&base);
        let _guard = lock.lock().await;

        if !base.exists() {
            self.write_file(&base, &artifact.bytes).await?;
            tracing::info!("Installed {} {}", artifact.kind, base.display());
            return Ok(StoreOutcome::Installed { path: base });
        }

        let incoming = digest::sha256_bytes(&artifact.bytes);

        if self.file_digest(&base).await? == incoming {
            tracing::debug!("{} already installed at {}", artifact.kind, base.display());
            return Ok(StoreOutcome::AlreadyInstalled { path: base });
        }

        // Same name, different content: try "name (2).ext", "name (3).ext", ...
        let mut n = 2u32;
        loop {
            let candidate = dir.join(numbered_file_name(&file_name, n));

            if !candidate.exists() {
                self.write_file(&candidate, &artifact.bytes).await?;
                tracing::info!("Installed {} {}", artifact.kind, candidate.display());
                return Ok(StoreOutcome::Installed { path: candidate });
            }

            if self.file_digest(&candidate).await? == incoming {
                tracing::debug!(
                    "{} already installed at {}",
                    artifact.kind,
                    candidate.display()
                );
                return Ok(StoreOutcome::AlreadyInstalled { path: candidate });
            }

            n += 1;
        }
    }

    async fn write_file(&self, path: &Path, bytes: &[u8]) -> StoreResult<()> {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })
    }

    async fn file_digest(&self, path: &Path) -> StoreResult<String> {
        digest::sha256_file_async(path)
            .await
            .map_err(|e| StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })
    }

    // ===== Mod archives =====

    async fn store_mod_archive(&self, artifact: Artifact) -> StoreResult<StoreOutcome> {
        let Artifact {
            bytes, download, ..
        } = artifact;

        // Archive decoding is CPU-bound; keep it off the async threads.
        let parsed = tokio::task::spawn_blocking(
            move || -> StoreResult<(ModArchive, ModManifest)> {
                let mut archive = ModArchive::open(bytes)?;

                let manifest_bytes = archive.read_file(MANIFEST_FILENAME)?;
                let Some(manifest_bytes) = manifest_bytes else {
                    return Err(StoreError::MissingManifest {
                        main_folder: archive.main_folder().to_string(),
                    });
                };

                let manifest = ModManifest::from_slice(&manifest_bytes)?;
                Ok((archive, manifest))
            },
        )
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?;
        let (mut archive, packaged) = parsed?;

        // The download details are authoritative over the packaged manifest.
        let (repository, tag) = match download {
            Some(info) => (Some(info.repository), Some(info.tag)),
            None => (packaged.repository.clone(), packaged.tag.clone()),
        };
        let Some(repository) = repository else {
            return Err(StoreError::MissingRepository);
        };

        let folder = repository_folder_name(&repository);
        let manifest = ModManifest {
            name: if packaged.name.is_empty() {
                folder.clone()
            } else {
                packaged.name.clone()
            },
            repository: Some(repository.clone()),
            tag: tag.clone(),
            is_enabled: true,
            is_development: false,
            path: folder.clone(),
        };

        let mods_dir = self
            .game
            .ensure_storage_path(AssetKind::Mod)
            .map_err(|e| StoreError::Io {
                path: self.game.storage_path(AssetKind::Mod),
                source: e,
            })?;
        let dest = mods_dir.join(&folder);

        let lock = self.destination_lock(&dest);
        let _guard = lock.lock().await;

        let catalog = AssetCatalog::new(self.game.clone());
        let existing = catalog.find_mod_by_repository(&repository)?;

        if let Some(existing) = &existing {
            if existing.development || existing.tag == tag {
                tracing::info!(
                    "Mod {} is already current at {}",
                    repository,
                    existing.path.display()
                );
                return Ok(StoreOutcome::AlreadyInstalled {
                    path: existing.path.clone(),
                });
            }
        }

        // Stage the new tree inside the mods directory so the final rename
        // stays on one filesystem.
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&mods_dir)
            .map_err(|e| StoreError::Io {
                path: mods_dir.clone(),
                source: e,
            })?;

        let manifest_json = manifest.to_json()?;
        let staging_path = staging.path().to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || -> StoreResult<()> {
            archive.extract_main_folder_into(&staging_path)?;

            let manifest_path = staging_path.join(MANIFEST_FILENAME);
            std::fs::write(&manifest_path, manifest_json.as_bytes()).map_err(|e| {
                StoreError::Io {
                    path: manifest_path,
                    source: e,
                }
            })?;

            Ok(())
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?;
        extracted?;

        // Swap: move the old install aside, then rename the staged tree in.
        let mut previous: Option<(PathBuf, PathBuf)> = None;
        let mut previous_tag = None;

        if let Some(existing) = existing {
            previous_tag = existing.tag.clone();
            let aside = mods_dir.join(format!(".{}.replaced-{}", folder, replace_stamp()));

            tokio::fs::rename(&existing.path, &aside)
                .await
                .map_err(|e| StoreError::Io {
                    path: existing.path.clone(),
                    source: e,
                })?;

            previous = Some((aside, existing.path));
        }

        let staged_path = staging.keep();
        if let Err(e) = tokio::fs::rename(&staged_path, &dest).await {
            if let Some((aside, original)) = &previous {
                if let Err(restore) = tokio::fs::rename(aside, original).await {
                    tracing::warn!(
                        "Could not restore previous install to {}: {}",
                        original.display(),
                        restore
                    );
                }
            }
            let _ = tokio::fs::remove_dir_all(&staged_path).await;
            return Err(StoreError::Io {
                path: dest,
                source: e,
            });
        }

        if let Some((aside, _)) = &previous {
            if let Err(e) = tokio::fs::remove_dir_all(aside).await {
                tracing::warn!(
                    "Could not remove replaced mod at {}: {}",
                    aside.display(),
                    e
                );
            }
        }

        let asset = ModAsset {
            id: folder.clone(),
            name: manifest.name.clone(),
            repository: Some(repository.clone()),
            tag: tag.clone(),
            enabled: true,
            development: false,
            path: dest.clone(),
        };

        self.hooks
            .copy_asset_bundles(&asset, &self.game)
            .await
            .map_err(|source| StoreError::PostInstall {
                stage: "asset bundle copy",
                source,
            })?;
        self.hooks
            .compile(&asset, &self.game)
            .await
            .map_err(|source| StoreError::PostInstall {
                stage: "compile",
                source,
            })?;

        let label = tag.as_deref().unwrap_or("untagged");
        if previous.is_some() {
            tracing::info!(
                "Replaced mod {} with {} at {}",
                repository,
                label,
                dest.display()
            );
            Ok(StoreOutcome::Replaced {
                path: dest,
                previous_tag,
            })
        } else {
            tracing::info!("Installed mod {} {} at {}", repository, label, dest.display());
            Ok(StoreOutcome::Installed { path: dest })
        }
    }

    fn destination_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        self.locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }
}

/// Reduce a suggested file name to a single safe path component.
fn sanitized_file_name(name: &str) -> Option<&str> {
    let path = Path::new(name);
    let mut components = path.components();

    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None) => component.to_str(),
        _ => None,
    }
}

/// Build the n-th disambiguated candidate for a file name.
///
/// The counter goes before the final extension: `bridge.bp` becomes
/// `bridge (2).bp`, extensionless names get a plain ` (2)` suffix.
fn numbered_file_name(name: &str, n: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => {
            format!("{} ({}).{}", stem, n, extension)
        }
        _ => format!("{} ({})", name, n),
    }
}

/// Unique suffix for set-aside directories during a replace.
fn replace_stamp() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}
