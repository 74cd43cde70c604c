//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;

use modvault::asset::AssetKind;
use modvault::config::Config;
use modvault::game::GameInstallation;

use crate::error::CliError;

/// Asset kind selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum AssetKindArg {
    /// Single blueprint file
    Blueprint,
    /// Single savegame file
    Savegame,
    /// Zipped mod archive with a mod.json manifest
    Mod,
}

impl From<AssetKindArg> for AssetKind {
    fn from(arg: AssetKindArg) -> Self {
        match arg {
            AssetKindArg::Blueprint => AssetKind::Blueprint,
            AssetKindArg::Savegame => AssetKind::Savegame,
            AssetKindArg::Mod => AssetKind::Mod,
        }
    }
}

/// Load the configuration file, falling back to defaults when absent.
pub fn load_config() -> Config {
    Config::load().unwrap_or_default()
}

/// Resolve the configured game installation.
///
/// Errors when no install directory is configured or the configured
/// directory does not exist on disk.
pub fn require_game(config: &Config) -> Result<GameInstallation, CliError> {
    let game = GameInstallation::from_config(config).ok_or(CliError::GameNotConfigured)?;

    if !game.is_installed() {
        return Err(CliError::Config(format!(
            "Game installation not found at {}",
            game.installation_path().display()
        )));
    }

    Ok(game)
}
