//! Downloaded artifacts waiting to be stored.

use crate::asset::AssetKind;

/// Version details for a mod artifact being installed.
///
/// Carried alongside the archive because the downloader knows which release
/// it fetched; the manifest inside the archive may be stale or incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadInfo {
    /// Remote source identity, e.g. "owner/name".
    pub repository: String,
    /// Version label being installed.
    pub tag: String,
}

impl DownloadInfo {
    /// Create download details for a release.
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
        }
    }
}

/// An in-memory downloaded artifact.
///
/// Transient: exists only for the duration of one store operation. The
/// payload is the raw file contents for blueprints and savegames, or a
/// whole zip archive for mods.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Which variant this artifact installs as.
    pub kind: AssetKind,
    /// Suggested file name, as downloaded.
    pub file_name: String,
    /// Raw payload bytes.
    pub bytes: Vec<u8>,
    /// Version details, present for mod archives fetched from a release.
    pub download: Option<DownloadInfo>,
}

impl Artifact {
    /// Create an artifact of the given kind.
    pub fn new(kind: AssetKind, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            bytes,
            download: None,
        }
    }

    /// Attach the release details this artifact was downloaded from.
    pub fn with_download(mut self, download: DownloadInfo) -> Self {
        self.download = Some(download);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_construction() {
        let artifact = Artifact::new(AssetKind::Blueprint, "bridge.bp", vec![1, 2, 3]);
        assert_eq!(artifact.kind, AssetKind::Blueprint);
        assert_eq!(artifact.file_name, "bridge.bp");
        assert_eq!(artifact.bytes, vec![1, 2, 3]);
        assert!(artifact.download.is_none());
    }

    #[test]
    fn test_artifact_with_download() {
        let artifact = Artifact::new(AssetKind::Mod, "signals.zip", vec![])
            .with_download(DownloadInfo::new("acme/signals", "v2"));

        let download = artifact.download.unwrap();
        assert_eq!(download.repository, "acme/signals");
        assert_eq!(download.tag, "v2");
    }
}
