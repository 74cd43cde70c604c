//! Store error types.

use std::path::PathBuf;

use crate::archive::ArchiveError;
use crate::asset::CatalogError;

use super::hooks::HookError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error from a store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The game installation could not be found on disk.
    #[error("game installation not found at {path}")]
    NotInstalled { path: PathBuf },

    /// The artifact's suggested file name is not a plain file name.
    #[error("invalid artifact file name {name:?}")]
    InvalidFileName { name: String },

    /// The artifact could not be opened or extracted as a mod archive.
    #[error(transparent)]
    InvalidArchive(#[from] ArchiveError),

    /// The archive has no manifest at `<main folder>/mod.json`.
    #[error("archive is missing {main_folder}/mod.json")]
    MissingManifest { main_folder: String },

    /// The manifest was present but could not be decoded.
    #[error("invalid manifest: {0}")]
    ManifestInvalid(#[from] serde_json::Error),

    /// Neither the download details nor the manifest named a repository.
    #[error("mod archive declares no repository identity")]
    MissingRepository,

    /// Disk I/O failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Background archive processing was cancelled or panicked.
    #[error("archive task failed: {0}")]
    TaskFailed(String),

    /// A post-install hook failed after the files were committed.
    ///
    /// The install itself stays on disk; only the hook's side effects are
    /// missing.
    #[error("post-install {stage} failed: {source}")]
    PostInstall {
        stage: &'static str,
        #[source]
        source: HookError,
    },
}

impl From<CatalogError> for StoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ReadFailed { path, source } => StoreError::Io { path, source },
        }
    }
}
