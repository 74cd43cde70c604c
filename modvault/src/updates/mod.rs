//! Update availability tracking for installed mods.
//!
//! A process constructs one [`UpdateTracker`] and shares it by handle.
//! The tracker reconciles installed mods against their remote releases,
//! keeps the result as an in-memory view, and persists it through the
//! [`cache`](crate::cache) layer so restarts within the check interval
//! answer without touching the network.
//!
//! # Overview
//!
//! - [`UpdateTracker::should_check_for_updates`] rate-limits scans to the
//!   check interval (1 hour by default).
//! - [`UpdateTracker::check_for_updates`] runs the scan and returns a
//!   [`CheckReport`] with per-asset failures instead of aborting.
//! - [`UpdateTracker::subscribe`] replays known updates to late
//!   subscribers before streaming new discoveries.
//!
//! The remote and inventory collaborators are trait parameters
//! ([`ModRepositoryClient`](crate::remote::ModRepositoryClient),
//! [`ModInventory`](crate::asset::ModInventory)), so tests drive the
//! tracker with mocks and never hit the network.

mod snapshot;
mod tracker;

pub use snapshot::{UpdateEntry, UpdateSnapshot, UPDATES_CACHE_KEY};
pub use tracker::{CheckFailure, CheckReport, UpdateError, UpdateResult, UpdateTracker};
