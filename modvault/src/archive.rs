//! In-memory mod archive handling.
//!
//! Mod archives are zip files whose entries all live under one **main
//! folder**: the full name of the archive's first entry. An archive built
//! as `foo/mod.json`, `foo/scripts/init.lua` has main folder `foo`; a
//! nested layout like `mods/foo/...` works the same way with main folder
//! `mods/foo`. Extraction strips that prefix so the install directory
//! contains the mod's files directly.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

/// Error opening or extracting a mod archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The archive contains no entries at all.
    #[error("archive contains no entries")]
    Empty,
    /// The archive could not be read as a zip file.
    #[error("failed to read archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// Writing an extracted entry failed.
    #[error("failed to extract {path}: {source}")]
    ExtractFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A downloaded mod archive held in memory.
pub struct ModArchive {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    main_folder: String,
}

impl ModArchive {
    /// Open an in-memory archive and determine its main folder.
    ///
    /// Fails with [`ArchiveError::Empty`] when the archive has no entries
    /// and [`ArchiveError::Zip`] when the bytes are not a valid zip file.
    pub fn open(bytes: Vec<u8>) -> Result<Self, ArchiveError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        if archive.is_empty() {
            return Err(ArchiveError::Empty);
        }

        let main_folder = {
            let first = archive.by_index_raw(0)?;
            normalize_entry_path(first.name())
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            archive,
            main_folder,
        })
    }

    /// The archive's main folder, as named by its first entry.
    pub fn main_folder(&self) -> &str {
        &self.main_folder
    }

    /// Read the entry at `<main folder>/<name>`, if present.
    ///
    /// Entry paths are compared with separators normalized, so archives
    /// built with backslash separators resolve the same way.
    pub fn read_file(&mut self, name: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
        let wanted = format!("{}/{}", self.main_folder, name);

        let mut found = None;
        for index in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(index)?;
            if normalize_entry_path(entry.name()) == wanted {
                found = Some(index);
                break;
            }
        }

        let Some(index) = found else {
            return Ok(None);
        };

        let mut entry = self.archive.by_index(index)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| ArchiveError::ExtractFailed {
                path: PathBuf::from(&wanted),
                source: e,
            })?;

        Ok(Some(bytes))
    }

    /// Extract every entry under the main folder into `dest`, stripping the
    /// main-folder prefix.
    ///
    /// Directory markers only create the directory; file entries are written
    /// verbatim with parent directories created as needed. Entries outside
    /// the main folder are ignored, as are entries whose path would escape
    /// the destination.
    pub fn extract_main_folder_into(&mut self, dest: &Path) -> Result<(), ArchiveError> {
        let prefix = format!("{}/", self.main_folder);

        for index in 0..self.archive.len() {
            let mut entry = self.archive.by_index(index)?;

            if entry.enclosed_name().is_none() {
                tracing::warn!("Skipping unsafe archive entry {:?}", entry.name());
                continue;
            }

            let name = normalize_entry_path(entry.name());
            let Some(relative) = name.strip_prefix(&prefix) else {
                continue;
            };
            if relative.is_empty() {
                continue;
            }

            let target = dest.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&target).map_err(|e| ArchiveError::ExtractFailed {
                    path: target.clone(),
                    source: e,
                })?;
                continue;
            }

            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ArchiveError::ExtractFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            let mut out =
                std::fs::File::create(&target).map_err(|e| ArchiveError::ExtractFailed {
                    path: target.clone(),
                    source: e,
                })?;
            std::io::copy(&mut entry, &mut out).map_err(|e| ArchiveError::ExtractFailed {
                path: target.clone(),
                source: e,
            })?;
        }

        Ok(())
    }
}

/// Normalize an archive entry path to forward slashes.
fn normalize_entry_path(name: &str) -> String {
    name.replace('\\', "/")
}
