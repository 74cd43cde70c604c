//! Integration tests for the asset store.
//!
//! These tests drive the public store API end to end against a real
//! temporary game directory:
//! - Plain-file installs, content dedup, and name disambiguation
//! - Mod archive installs, same-tag no-ops, and staged replacement
//! - Racing installs of one destination (serialized, never torn)
//! - Catalog visibility of everything the store wrote
//!
//! Run with: `cargo test --test store_integration`

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use modvault::asset::{Asset, AssetCatalog, AssetKind, ModManifest};
use modvault::game::GameInstallation;
use modvault::store::{Artifact, AssetStore, DownloadInfo, NoOpHooks, StoreOutcome};

// ============================================================================
// Fixtures
// ============================================================================

/// Build a zip archive in memory from (path, contents) pairs.
///
/// Entries with `None` contents become explicit directory markers.
fn build_zip(entries: &[(&str, Option<&[u8]>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, contents) in entries {
        match contents {
            Some(bytes) => {
                writer.start_file(*name, options).unwrap();
                writer.write_all(bytes).unwrap();
            }
            None => {
                writer.add_directory(*name, options).unwrap();
            }
        }
    }

    writer.finish().unwrap().into_inner()
}

/// A fresh game root on disk plus a store for it.
fn game_fixture() -> (TempDir, GameInstallation, AssetStore<NoOpHooks>) {
    let temp = TempDir::new().unwrap();
    let game = GameInstallation::new(temp.path());
    let store = AssetStore::new(game.clone(), NoOpHooks);
    (temp, game, store)
}

fn read_manifest(mod_dir: &Path) -> ModManifest {
    let raw = std::fs::read(mod_dir.join("mod.json")).unwrap();
    ModManifest::from_slice(&raw).unwrap()
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Plain Files
// ============================================================================

/// Re-storing the identical file is a no-op, not a second copy.
#[tokio::test]
async fn test_plain_file_reinstall_is_idempotent() {
    let (_temp, game, store) = game_fixture();

    let first = store
        .store(Artifact::new(
            AssetKind::Blueprint,
            "reactor.bp",
            b"layout v1".to_vec(),
        ))
        .await
        .unwrap();
    let installed_path = first.path().to_path_buf();
    assert!(matches!(first, StoreOutcome::Installed { .. }));
    assert_eq!(std::fs::read(&installed_path).unwrap(), b"layout v1");

    let second = store
        .store(Artifact::new(
            AssetKind::Blueprint,
            "reactor.bp",
            b"layout v1".to_vec(),
        ))
        .await
        .unwrap();
    assert!(
        matches!(second, StoreOutcome::AlreadyInstalled { .. }),
        "identical content should be recognized, got {:?}",
        second
    );
    assert_eq!(second.path(), installed_path);

    assert_eq!(
        dir_entries(&game.blueprints_path()),
        vec!["reactor.bp".to_string()],
        "dedup must not leave extra copies behind"
    );
}

/// Same name, different content: later installs get (2), (3), ... suffixes,
/// and a re-download of any of them is recognized by digest.
#[tokio::test]
async fn test_conflicting_names_get_numbered_suffixes() {
    let (_temp, game, store) = game_fixture();

    for contents in [&b"alpha"[..], b"bravo", b"charlie"] {
        store
            .store(Artifact::new(
                AssetKind::Blueprint,
                "reactor.bp",
                contents.to_vec(),
            ))
            .await
            .unwrap();
    }

    assert_eq!(
        dir_entries(&game.blueprints_path()),
        vec![
            "reactor (2).bp".to_string(),
            "reactor (3).bp".to_string(),
            "reactor.bp".to_string(),
        ]
    );

    // The second variant comes in again under the original name; the search
    // must find its numbered twin rather than minting "reactor (4).bp".
    let again = store
        .store(Artifact::new(
            AssetKind::Blueprint,
            "reactor.bp",
            b"bravo".to_vec(),
        ))
        .await
        .unwrap();
    assert!(matches!(again, StoreOutcome::AlreadyInstalled { .. }));
    assert_eq!(
        again.path(),
        game.blueprints_path().join("reactor (2).bp")
    );
}

/// Savegames land in their own storage folder, independent of blueprints.
#[tokio::test]
async fn test_savegames_use_their_own_storage_folder() {
    let (_temp, game, store) = game_fixture();

    let outcome = store
        .store(Artifact::new(
            AssetKind::Savegame,
            "colony-day-12.sav",
            b"save data".to_vec(),
        ))
        .await
        .unwrap();

    assert_eq!(
        outcome.path(),
        game.savegames_path().join("colony-day-12.sav")
    );
    assert!(game.savegames_path().is_dir());
    assert!(
        !game.blueprints_path().exists(),
        "storing a savegame must not create unrelated folders"
    );
}

// ============================================================================
// Mod Archives
// ============================================================================

/// Full install flow for a nested archive: the main folder is discovered,
/// files land at their archive-relative paths, and the manifest is rewritten
/// with the release identity.
#[tokio::test]
async fn test_mod_install_end_to_end() {
    let (_temp, game, store) = game_fixture();

    // Packaged manifest disagrees with the release on every overridable field.
    let packaged = br#"{
        "name": "Foo",
        "tag": "0.9-beta",
        "isEnabled": false,
        "isDevelopment": true,
        "path": "somewhere-else"
    }"#;
    let archive = build_zip(&[
        ("mods/foo/mod.json", Some(&packaged[..])),
        ("mods/foo/code/init.lua", Some(&b"print(1)"[..])),
        ("mods/foo/assets/texture.bin", Some(&[0u8, 159, 146, 150][..])),
    ]);

    let outcome = store
        .store(
            Artifact::new(AssetKind::Mod, "foo.zip", archive)
                .with_download(DownloadInfo::new("a/foo", "1.0")),
        )
        .await
        .unwrap();

    let mod_dir = game.mods_path().join("a_foo");
    assert!(matches!(outcome, StoreOutcome::Installed { .. }));
    assert_eq!(outcome.path(), mod_dir);

    // Files appear at their paths relative to the main folder.
    assert_eq!(
        std::fs::read(mod_dir.join("code/init.lua")).unwrap(),
        b"print(1)"
    );
    assert_eq!(
        std::fs::read(mod_dir.join("assets/texture.bin")).unwrap(),
        [0u8, 159, 146, 150]
    );

    // The release identity wins over the packaged manifest.
    let manifest = read_manifest(&mod_dir);
    assert_eq!(manifest.name, "Foo");
    assert_eq!(manifest.repository.as_deref(), Some("a/foo"));
    assert_eq!(manifest.tag.as_deref(), Some("1.0"));
    assert!(manifest.is_enabled, "installed mods start enabled");
    assert!(!manifest.is_development, "released archives are never dev");
    assert_eq!(manifest.path, "a_foo");
}

/// Reinstalling the tag that is already installed must not touch the disk.
#[tokio::test]
async fn test_mod_same_tag_reinstall_leaves_disk_untouched() {
    let (_temp, game, store) = game_fixture();

    let archive = build_zip(&[
        ("foo/mod.json", Some(&br#"{"name": "Foo"}"#[..])),
        ("foo/init.lua", Some(&b"print(1)"[..])),
    ]);
    store
        .store(
            Artifact::new(AssetKind::Mod, "foo.zip", archive.clone())
                .with_download(DownloadInfo::new("a/foo", "1.0")),
        )
        .await
        .unwrap();

    // Local state the user added after installing.
    let mod_dir = game.mods_path().join("a_foo");
    std::fs::write(mod_dir.join("user-notes.txt"), "keep me").unwrap();

    let outcome = store
        .store(
            Artifact::new(AssetKind::Mod, "foo.zip", archive)
                .with_download(DownloadInfo::new("a/foo", "1.0")),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, StoreOutcome::AlreadyInstalled { .. }));
    assert_eq!(
        std::fs::read_to_string(mod_dir.join("user-notes.txt")).unwrap(),
        "keep me",
        "a same-tag reinstall must be a disk no-op"
    );
}

/// Replacing with a newer release removes the old files entirely; nothing
/// from the previous version bleeds into the new install.
#[tokio::test]
async fn test_mod_replace_removes_old_files_entirely() {
    let (_temp, game, store) = game_fixture();

    let v1 = build_zip(&[
        (
            "foo/mod.json",
            Some(&br#"{"name": "Foo", "tag": "1.0"}"#[..]),
        ),
        ("foo/old_only.lua", Some(&b"retired code"[..])),
    ]);
    store
        .store(
            Artifact::new(AssetKind::Mod, "foo.zip", v1)
                .with_download(DownloadInfo::new("a/foo", "1.0")),
        )
        .await
        .unwrap();

    let v2 = build_zip(&[
        (
            "foo/mod.json",
            Some(&br#"{"name": "Foo", "tag": "2.0"}"#[..]),
        ),
        ("foo/new_only.lua", Some(&b"fresh code"[..])),
    ]);
    let outcome = store
        .store(
            Artifact::new(AssetKind::Mod, "foo.zip", v2)
                .with_download(DownloadInfo::new("a/foo", "2.0")),
        )
        .await
        .unwrap();

    let mod_dir = game.mods_path().join("a_foo");
    assert!(
        matches!(
            &outcome,
            StoreOutcome::Replaced { previous_tag: Some(tag), .. } if tag == "1.0"
        ),
        "expected a replace of 1.0, got {:?}",
        outcome
    );

    assert!(
        !mod_dir.join("old_only.lua").exists(),
        "files from the replaced version must not survive"
    );
    assert_eq!(
        std::fs::read(mod_dir.join("new_only.lua")).unwrap(),
        b"fresh code"
    );
    assert_eq!(read_manifest(&mod_dir).tag.as_deref(), Some("2.0"));

    // No staging or set-aside directories left behind.
    assert_eq!(dir_entries(&game.mods_path()), vec!["a_foo".to_string()]);
}

// ============================================================================
// Concurrent Installs
// ============================================================================

/// Simultaneous installs of identical content: exactly one racer writes,
/// the others recognize the freshly written copy, and a single file exists
/// afterwards. The existence check and the write must not interleave.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_identical_installs_store_one_copy() {
    let (_temp, game, store) = game_fixture();
    let store = Arc::new(store);

    let mut racers = Vec::new();
    for _ in 0..4 {
        let store = store.clone();
        racers.push(tokio::spawn(async move {
            store
                .store(Artifact::new(
                    AssetKind::Blueprint,
                    "reactor.bp",
                    b"layout v1".to_vec(),
                ))
                .await
                .unwrap()
        }));
    }

    let mut installed = 0;
    let mut already = 0;
    let expected = game.blueprints_path().join("reactor.bp");
    for racer in racers {
        match racer.await.unwrap() {
            StoreOutcome::Installed { path } => {
                installed += 1;
                assert_eq!(path, expected);
            }
            StoreOutcome::AlreadyInstalled { path } => {
                already += 1;
                assert_eq!(path, expected);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    assert_eq!(installed, 1, "exactly one racer should write the file");
    assert_eq!(already, 3, "the rest should recognize the written copy");
    assert_eq!(
        dir_entries(&game.blueprints_path()),
        vec!["reactor.bp".to_string()]
    );
    assert_eq!(std::fs::read(&expected).unwrap(), b"layout v1");
}

/// Distinct content racing for one name: both payloads survive, one under
/// the plain name and one under a numbered suffix, each intact.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_conflicting_installs_keep_both_payloads() {
    let (_temp, game, store) = game_fixture();
    let store = Arc::new(store);

    let alpha = tokio::spawn({
        let store = store.clone();
        async move {
            store
                .store(Artifact::new(
                    AssetKind::Savegame,
                    "colony.sav",
                    b"alpha state".to_vec(),
                ))
                .await
                .unwrap()
        }
    });
    let bravo = tokio::spawn({
        let store = store.clone();
        async move {
            store
                .store(Artifact::new(
                    AssetKind::Savegame,
                    "colony.sav",
                    b"bravo state".to_vec(),
                ))
                .await
                .unwrap()
        }
    });

    let alpha = alpha.await.unwrap();
    let bravo = bravo.await.unwrap();

    assert!(matches!(alpha, StoreOutcome::Installed { .. }));
    assert!(matches!(bravo, StoreOutcome::Installed { .. }));
    assert_ne!(
        alpha.path(),
        bravo.path(),
        "racing installs must not claim the same destination"
    );

    assert_eq!(
        dir_entries(&game.savegames_path()),
        vec!["colony (2).sav".to_string(), "colony.sav".to_string()]
    );
    assert_eq!(std::fs::read(alpha.path()).unwrap(), b"alpha state");
    assert_eq!(std::fs::read(bravo.path()).unwrap(), b"bravo state");
}

// ============================================================================
// Catalog Visibility
// ============================================================================

/// Everything the store writes is visible to the catalog afterwards.
#[tokio::test]
async fn test_catalog_sees_installed_assets() {
    let (_temp, game, store) = game_fixture();

    store
        .store(Artifact::new(
            AssetKind::Blueprint,
            "bridge.bp",
            b"girders".to_vec(),
        ))
        .await
        .unwrap();

    let archive = build_zip(&[
        ("foo/mod.json", Some(&br#"{"name": "Foo"}"#[..])),
        ("foo/init.lua", Some(&b"print(1)"[..])),
    ]);
    store
        .store(
            Artifact::new(AssetKind::Mod, "foo.zip", archive)
                .with_download(DownloadInfo::new("a/foo", "1.0")),
        )
        .await
        .unwrap();

    let catalog = AssetCatalog::new(game);
    let assets = catalog.list_all().unwrap();

    assert_eq!(assets.len(), 2);
    assert!(assets
        .iter()
        .any(|a| matches!(a, Asset::Blueprint(f) if f.id == "bridge.bp")));
    let module = assets
        .iter()
        .find_map(|a| match a {
            Asset::Mod(m) => Some(m),
            _ => None,
        })
        .expect("mod should be listed");
    assert_eq!(module.id, "a_foo");
    assert_eq!(module.repository.as_deref(), Some("a/foo"));
    assert_eq!(module.tag.as_deref(), Some("1.0"));
    assert!(module.enabled);
    assert!(!module.development);
}
