//! Modvault - Asset installation and update tracking for game add-ons
//!
//! This library provides the core functionality for managing third-party
//! add-ons (mods, blueprints, savegames) for an external game installation:
//! installing downloaded artifacts with content-hash deduplication, and
//! tracking which installed mods have newer versions available online.
//!
//! # High-Level API
//!
//! Installation goes through [`store::AssetStore`]:
//!
//! ```ignore
//! use modvault::config::Config;
//! use modvault::game::GameInstallation;
//! use modvault::store::{AssetStore, NoOpHooks};
//!
//! let config = Config::load()?;
//! let game = GameInstallation::from_config(&config)
//!     .ok_or("no game installation configured")?;
//! let store = AssetStore::new(game, NoOpHooks);
//!
//! let outcome = store.store(artifact).await?;
//! ```
//!
//! Update polling goes through [`updates::UpdateTracker`], which caches the
//! result of each remote scan and replays known updates to late subscribers.

pub mod archive;
pub mod asset;
pub mod cache;
pub mod config;
pub mod digest;
pub mod game;
pub mod logging;
pub mod remote;
pub mod store;
pub mod updates;

/// Version of the modvault library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
