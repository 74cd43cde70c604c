//! Durable installation of downloaded assets.
//!
//! The [`AssetStore`] takes an [`Artifact`] (the raw bytes of a download
//! plus where they came from) and commits it into the game's storage
//! folders. Blueprints and savegames land as single files, deduplicated
//! by content. Mods land as whole directories extracted from a zip
//! archive, with their `mod.json` manifest rewritten to reflect the
//! install.
//!
//! # Example
//!
//! ```ignore
//! use modvault::game::GameInstallation;
//! use modvault::store::{Artifact, AssetStore, DownloadInfo, NoOpHooks};
//! use modvault::asset::AssetKind;
//!
//! let game = GameInstallation::new("/path/to/game");
//! let store = AssetStore::new(game, NoOpHooks);
//!
//! let artifact = Artifact::new(AssetKind::Mod, "foo.zip", bytes)
//!     .with_download(DownloadInfo::new("acme/foo", "v1.2.0"));
//! let outcome = store.store(artifact).await?;
//! println!("installed at {}", outcome.path().display());
//! ```

mod artifact;
mod error;
mod hooks;
mod install;

pub use artifact::{Artifact, DownloadInfo};
pub use error::{StoreError, StoreResult};
pub use hooks::{HookError, InstallHooks, NoOpHooks};
pub use install::{AssetStore, StoreOutcome};
