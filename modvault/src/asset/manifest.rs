//! The `mod.json` manifest carried by every installed mod.

use serde::{Deserialize, Serialize};

/// Manifest file name within installed mod directories.
pub const MANIFEST_FILENAME: &str = "mod.json";

/// Manifest describing an installed mod.
///
/// Written by the store on install, read back by the catalog when
/// enumerating installed mods. Field names follow the on-disk camelCase
/// convention so manifests shipped inside mod archives parse as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModManifest {
    /// Human-readable mod name.
    #[serde(default)]
    pub name: String,
    /// Remote source identity, e.g. "owner/name". Absent for local mods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Installed version label. Compared for equality only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Whether the game should load this mod.
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    /// Development mods are local work-in-progress and never version-tracked.
    #[serde(default)]
    pub is_development: bool,
    /// Folder name of the install, relative to the mods directory.
    #[serde(default)]
    pub path: String,
}

fn default_enabled() -> bool {
    true
}

impl ModManifest {
    /// Parse a manifest from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialize the manifest to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Derive the on-disk folder name for a repository identity.
///
/// Path separators and drive markers are replaced with underscores so
/// "owner/name" installs to "owner_name" on every platform. The mapping is
/// deterministic: the same repository always lands in the same folder.
pub fn repository_folder_name(repository: &str) -> String {
    repository
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            other => other,
        })
        .collect()
}
