//! Update tracking manager: scans, cached answers, and subscriptions.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};

use crate::asset::{Asset, AssetKind, ModInventory};
use crate::cache::{CacheError, KeyValueCache};
use crate::remote::{ModRepositoryClient, RemoteError};

use super::snapshot::{UpdateEntry, UpdateSnapshot, UPDATES_CACHE_KEY};

/// Default interval between full update scans (1 hour).
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 3600;

/// Error from a single-asset update query.
///
/// Scans never surface this: cache and inventory failures there are logged
/// or collected into the [`CheckReport`] so a partial scan still commits.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// The remote release query failed.
    #[error("Remote query failed: {0}")]
    Remote(#[from] RemoteError),
}

pub type UpdateResult<T> = Result<T, UpdateError>;

/// One asset a scan could not check.
#[derive(Debug, Clone)]
pub struct CheckFailure {
    /// Id of the asset that failed, or `"mod inventory"` when the
    /// installed-mod listing itself could not be read.
    pub id: String,
    /// Why the check failed.
    pub reason: String,
}

/// Outcome of a full update scan.
///
/// A scan keeps going past individual failures; the report says how much
/// of it succeeded rather than collapsing a partial scan into an error.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Tracked mods whose remote was queried successfully.
    pub checked: usize,
    /// Mods found with a newer release than the installed one.
    pub updates_found: usize,
    /// Assets that could not be checked.
    pub failures: Vec<CheckFailure>,
}

impl CheckReport {
    /// True when every tracked mod was checked.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Guarded in-memory view of known updates.
#[derive(Default)]
struct TrackerState {
    /// Set once a scan has committed or a persisted record was adopted.
    has_checked: bool,
    /// (kind, id) -> latest remote tag. Replaced wholesale on commit,
    /// never merged entry by entry.
    available: BTreeMap<(AssetKind, String), String>,
    subscribers: Vec<mpsc::UnboundedSender<UpdateEntry>>,
}

impl TrackerState {
    /// Replace the view with a fresh scan result and notify subscribers
    /// of entries that are new or carry a changed tag.
    ///
    /// Runs under the state lock, so a replaying subscriber can never
    /// observe a view that excludes a notification it was sent.
    fn commit(&mut self, entries: Vec<UpdateEntry>) {
        let mut fresh = BTreeMap::new();
        let mut announcements = Vec::new();

        for entry in entries {
            let key = (entry.kind, entry.id.clone());
            let known = self.available.get(&key) == Some(&entry.latest_tag);
            if !known {
                announcements.push(entry.clone());
            }
            fresh.insert(key, entry.latest_tag);
        }

        self.available = fresh;
        self.has_checked = true;

        if !announcements.is_empty() {
            self.subscribers
                .retain(|tx| announcements.iter().all(|e| tx.send(e.clone()).is_ok()));
        }
    }
}

/// Clears the in-flight flag when a scan exits, on every path.
struct CheckingGuard<'a>(&'a AtomicBool);

impl Drop for CheckingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Tracks which installed mods have newer releases available.
///
/// One tracker instance is constructed per process and shared by handle.
/// It owns the in-memory updates view, persists each scan as an
/// [`UpdateSnapshot`] under a fixed cache key, and rate-limits scans with
/// a check interval. Read paths answer from the cached view; only the
/// explicitly-online queries touch the network.
///
/// # Example
///
/// ```ignore
/// use modvault::updates::UpdateTracker;
///
/// let tracker = UpdateTracker::new(client, catalog, cache);
///
/// if tracker.should_check_for_updates().await {
///     let report = tracker.check_for_updates().await;
///     println!("{} updates available", report.updates_found);
/// }
/// ```
pub struct UpdateTracker<C: ModRepositoryClient, I: ModInventory> {
    client: C,
    inventory: I,
    cache: Arc<dyn KeyValueCache>,
    check_interval: Duration,
    checking: AtomicBool,
    state: Mutex<TrackerState>,
}

impl<C: ModRepositoryClient, I: ModInventory> UpdateTracker<C, I> {
    /// Create a tracker with the default 1-hour check interval.
    pub fn new(client: C, inventory: I, cache: Arc<dyn KeyValueCache>) -> Self {
        Self {
            client,
            inventory,
            cache,
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            checking: AtomicBool::new(false),
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// Set the interval between full scans.
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// The current check interval.
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Whether a scan has committed (or a persisted record been adopted)
    /// since this tracker was constructed.
    pub async fn has_checked(&self) -> bool {
        self.state.lock().await.has_checked
    }

    /// Whether a full scan is due.
    ///
    /// True when no scan record is persisted, the record cannot be
    /// decoded, or it is older than the check interval. False while a
    /// scan is in flight. A fresh persisted record is adopted into the
    /// in-memory view on the way, so later queries answer from it
    /// without a network round-trip.
    pub async fn should_check_for_updates(&self) -> bool {
        let Some(snapshot) = self.load_snapshot() else {
            return true;
        };

        if snapshot.is_stale(self.check_interval) {
            return true;
        }

        if self.checking.load(Ordering::SeqCst) {
            return false;
        }

        let mut state = self.state.lock().await;
        if !state.has_checked {
            state.commit(snapshot.updates);
        }
        false
    }

    /// Run a full update scan over the installed mods.
    ///
    /// Queries the remote for every mod that has a repository and is not
    /// a development mod. Individual failures are logged and collected in
    /// the report; the scan continues with the remaining mods. On
    /// completion the in-memory view is replaced with the scan result and
    /// persisted under one lock acquisition, whether or not some assets
    /// failed; scans that overlap commit in order, so the persisted record
    /// always matches the view of whichever scan committed last.
    pub async fn check_for_updates(&self) -> CheckReport {
        self.checking.store(true, Ordering::SeqCst);
        let _guard = CheckingGuard(&self.checking);

        let mut report = CheckReport::default();

        let mods = match self.inventory.installed_mods() {
            Ok(mods) => mods,
            Err(e) => {
                tracing::warn!("Could not read installed mods: {}", e);
                report.failures.push(CheckFailure {
                    id: "mod inventory".to_string(),
                    reason: e.to_string(),
                });
                Vec::new()
            }
        };

        let mut entries = Vec::new();
        for asset in mods.iter().filter(|m| m.is_tracked()) {
            let Some(repository) = asset.repository.as_deref() else {
                continue;
            };

            match self.client.latest_tag(repository).await {
                Ok(latest) => {
                    report.checked += 1;
                    if let Some(latest) = latest {
                        if asset.tag.as_deref() != Some(latest.as_str()) {
                            entries.push(UpdateEntry {
                                kind: AssetKind::Mod,
                                id: asset.id.clone(),
                                latest_tag: latest,
                            });
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Update check failed for {} ({}): {}", asset.id, repository, e);
                    report.failures.push(CheckFailure {
                        id: asset.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.updates_found = entries.len();

        let snapshot = UpdateSnapshot::new(entries.clone());
        {
            let mut state = self.state.lock().await;
            state.commit(entries);

            // Persisting inside the same lock acquisition keeps overlapping
            // scans ordered: the record on disk never falls behind the view.
            if let Err(e) = self.persist(&snapshot) {
                tracing::warn!("Could not persist update record: {}", e);
            }
        }

        tracing::info!(
            "Update scan finished: {} checked, {} updates available, {} failures",
            report.checked,
            report.updates_found,
            report.failures.len()
        );

        report
    }

    /// Ask the remote whether a newer release exists, bypassing the view.
    ///
    /// Plain-file assets and untracked mods (no repository, or development
    /// installs) are never updatable and answer without a network call.
    pub async fn is_update_available_online(&self, asset: &Asset) -> UpdateResult<bool> {
        let module = match asset {
            Asset::Blueprint(_) | Asset::Savegame(_) => return Ok(false),
            Asset::Mod(module) => module,
        };

        if !module.is_tracked() {
            return Ok(false);
        }
        let Some(repository) = module.repository.as_deref() else {
            return Ok(false);
        };

        let latest = self.client.latest_tag(repository).await?;
        Ok(match latest {
            Some(latest) => module.tag.as_deref() != Some(latest.as_str()),
            None => false,
        })
    }

    /// Answer from the in-memory view without any remote call.
    ///
    /// Loads the persisted record on first use. An asset that has never
    /// been seen by a scan answers `false`.
    pub async fn is_update_available(&self, asset: &Asset) -> bool {
        let module = match asset {
            Asset::Blueprint(_) | Asset::Savegame(_) => return false,
            Asset::Mod(module) => module,
        };

        self.ensure_loaded().await;

        let state = self.state.lock().await;
        state
            .available
            .contains_key(&(AssetKind::Mod, module.id.clone()))
    }

    /// Latest version label known for an asset.
    ///
    /// Answers from the view when any scan state exists: the remote tag
    /// for assets flagged updatable, the installed tag otherwise. Before
    /// any scan has ever run, falls through to a live remote query.
    pub async fn latest_known_tag(&self, asset: &Asset) -> UpdateResult<Option<String>> {
        let module = match asset {
            Asset::Blueprint(_) | Asset::Savegame(_) => return Ok(None),
            Asset::Mod(module) => module,
        };

        self.ensure_loaded().await;

        {
            let state = self.state.lock().await;
            if state.has_checked {
                let cached = state
                    .available
                    .get(&(AssetKind::Mod, module.id.clone()))
                    .cloned();
                return Ok(cached.or_else(|| module.tag.clone()));
            }
        }

        match module.repository.as_deref().filter(|_| !module.development) {
            Some(repository) => Ok(self.client.latest_tag(repository).await?),
            None => Ok(module.tag.clone()),
        }
    }

    /// Subscribe to update discoveries.
    ///
    /// Replays one event per currently-known update before registering
    /// the receiver, both under the state lock, so a late subscriber sees
    /// the full picture: already-known updates immediately, new ones as
    /// scans find them. Dropping the receiver unsubscribes.
    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<UpdateEntry> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut state = self.state.lock().await;
        for ((kind, id), tag) in &state.available {
            let _ = tx.send(UpdateEntry {
                kind: *kind,
                id: id.clone(),
                latest_tag: tag.clone(),
            });
        }
        state.subscribers.push(tx);

        rx
    }

    /// Adopt the persisted record into an untouched in-memory view.
    async fn ensure_loaded(&self) {
        let mut state = self.state.lock().await;
        if state.has_checked {
            return;
        }
        if let Some(snapshot) = self.load_snapshot() {
            state.commit(snapshot.updates);
        }
    }

    fn load_snapshot(&self) -> Option<UpdateSnapshot> {
        match self.cache.get(UPDATES_CACHE_KEY) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!("Discarding undecodable update record: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Could not read update record: {}", e);
                None
            }
        }
    }

    fn persist(&self, snapshot: &UpdateSnapshot) -> Result<(), CacheError> {
        let value = serde_json::to_value(snapshot)?;
        self.cache.set(UPDATES_CACHE_KEY, value)
    }
}
