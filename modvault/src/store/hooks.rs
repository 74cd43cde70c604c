//! Post-install hooks.
//!
//! After a mod's files land on disk, two externally-owned steps run: the
//! game's asset bundles are copied into place, and the mod's code is
//! compiled for the running game version. Both are opaque collaborators
//! behind [`InstallHooks`]; the store only sequences them.

use std::future::Future;

use crate::asset::ModAsset;
use crate::game::GameInstallation;

/// Error from a post-install hook.
#[derive(Debug, Clone)]
pub struct HookError {
    /// Human-readable error message.
    pub message: String,
}

impl HookError {
    /// Create a new hook error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for HookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for HookError {}

/// Post-install steps invoked after a mod's files are committed.
pub trait InstallHooks: Send + Sync {
    /// Copy the mod's asset bundles into the game's runtime location.
    fn copy_asset_bundles(
        &self,
        asset: &ModAsset,
        game: &GameInstallation,
    ) -> impl Future<Output = Result<(), HookError>> + Send;

    /// Compile the mod's code against the installed game version.
    fn compile(
        &self,
        asset: &ModAsset,
        game: &GameInstallation,
    ) -> impl Future<Output = Result<(), HookError>> + Send;
}

/// Hooks implementation that does nothing.
///
/// For callers that run bundle copying and compilation elsewhere, and for
/// tests that only exercise the install itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHooks;

impl InstallHooks for NoOpHooks {
    async fn copy_asset_bundles(
        &self,
        _asset: &ModAsset,
        _game: &GameInstallation,
    ) -> Result<(), HookError> {
        Ok(())
    }

    async fn compile(&self, _asset: &ModAsset, _game: &GameInstallation) -> Result<(), HookError> {
        Ok(())
    }
}
