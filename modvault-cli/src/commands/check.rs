//! Update check CLI command.

use std::sync::Arc;

use modvault::asset::{AssetCatalog, ModInventory};
use modvault::cache::JsonFileCache;
use modvault::config::cache_directory;
use modvault::remote::{GithubReleaseClient, ModRepositoryClient};
use modvault::updates::{UpdateEntry, UpdateTracker};

use crate::error::CliError;

use super::common::{load_config, require_game};

/// Run the check command.
///
/// Honors the configured check interval unless `force` is set: a recent
/// scan answers from the persisted record without touching the network.
pub async fn run(force: bool) -> Result<(), CliError> {
    let config = load_config();
    let game = require_game(&config)?;

    let client = GithubReleaseClient::new()?;
    let inventory = AssetCatalog::new(game);
    let cache = Arc::new(JsonFileCache::new(cache_directory()));

    let tracker = UpdateTracker::new(client, inventory, cache)
        .with_check_interval(config.check_interval());

    if !force && !tracker.should_check_for_updates().await {
        let entries = drain_known_updates(&tracker).await;
        print_entries(&entries, "Checked recently; showing recorded results.");
        return Ok(());
    }

    println!("Checking for mod updates...");
    println!();

    let report = tracker.check_for_updates().await;

    for failure in &report.failures {
        println!("  warning: could not check {}: {}", failure.id, failure.reason);
    }
    if !report.is_complete() {
        println!();
    }

    let entries = drain_known_updates(&tracker).await;
    print_entries(
        &entries,
        &format!("Checked {} mod(s).", report.checked),
    );

    Ok(())
}

/// Collect the tracker's known updates through a subscription replay.
async fn drain_known_updates<C, I>(tracker: &UpdateTracker<C, I>) -> Vec<UpdateEntry>
where
    C: ModRepositoryClient,
    I: ModInventory,
{
    let mut replay = tracker.subscribe().await;
    let mut entries = Vec::new();
    while let Ok(entry) = replay.try_recv() {
        entries.push(entry);
    }
    entries
}

fn print_entries(entries: &[UpdateEntry], summary: &str) {
    if entries.is_empty() {
        println!("{} All mods are up to date.", summary);
        return;
    }

    println!("{} {} update(s) available:", summary, entries.len());
    for entry in entries {
        println!("  {} -> {}", entry.id, entry.latest_tag);
    }
}
