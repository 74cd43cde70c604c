//! Asset model for installed add-ons.
//!
//! This module defines the closed set of asset variants the game can load,
//! the `mod.json` manifest format, and the catalog that discovers what is
//! currently installed.
//!
//! # Architecture
//!
//! - [`AssetKind`] / [`Asset`] - the variant sum type; every operation that
//!   cares about the variant matches on it exhaustively
//! - [`ModManifest`] - the manifest written into each installed mod's root
//! - [`AssetCatalog`] - enumerates installed assets from the game directory
//! - [`ModInventory`] - trait seam so the update tracker can be driven by a
//!   fixed mod list in tests

mod catalog;
mod manifest;
mod types;

pub use catalog::{AssetCatalog, CatalogError, ModInventory};
pub use manifest::{repository_folder_name, ModManifest, MANIFEST_FILENAME};
pub use types::{Asset, AssetKind, FileAsset, ModAsset, UnknownAssetKind};
