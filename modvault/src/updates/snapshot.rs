//! Persisted record of the last completed update scan.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::asset::AssetKind;

/// Fixed cache key the scan record is stored under.
pub const UPDATES_CACHE_KEY: &str = "updates_check";

/// One installed asset with a newer release available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntry {
    /// Variant of the asset the update applies to.
    pub kind: AssetKind,
    /// Installed asset id (the mod's folder name).
    pub id: String,
    /// Latest release tag seen on the remote.
    pub latest_tag: String,
}

/// Snapshot of an update scan: when it completed and what it found.
///
/// Persisted as one opaque cache entry under [`UPDATES_CACHE_KEY`]. The
/// timestamp is the moment the remote scan finished, not when the record
/// was last read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSnapshot {
    /// When the scan completed.
    pub checked_at: DateTime<Utc>,
    /// Assets with updates available at that time.
    pub updates: Vec<UpdateEntry>,
}

impl UpdateSnapshot {
    /// Snapshot stamped with the current time.
    pub fn new(updates: Vec<UpdateEntry>) -> Self {
        Self {
            checked_at: Utc::now(),
            updates,
        }
    }

    /// Whether this snapshot is older than the check interval.
    ///
    /// A timestamp from the future (clock moved backwards since the scan)
    /// also counts as stale so the next scan re-establishes a sane one.
    pub fn is_stale(&self, interval: Duration) -> bool {
        Utc::now()
            .signed_duration_since(self.checked_at)
            .to_std()
            .map(|elapsed| elapsed >= interval)
            .unwrap_or(true)
    }
}
