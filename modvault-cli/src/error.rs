//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use modvault::asset::CatalogError;
use modvault::config::ConfigError;
use modvault::remote::RemoteError;
use modvault::store::StoreError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// No game installation is configured
    GameNotConfigured,
    /// Failed to read an input file
    FileRead { path: String, error: std::io::Error },
    /// Failed to install an artifact
    Install(StoreError),
    /// Failed to scan installed assets
    Catalog(CatalogError),
    /// Failed to query remote releases
    Remote(RemoteError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::GameNotConfigured => {
                eprintln!();
                eprintln!("Point modvault at the game installation first:");
                eprintln!("  modvault config set game.install_dir /path/to/game");
            }
            CliError::Install(StoreError::NotInstalled { .. }) => {
                eprintln!();
                eprintln!("Check that game.install_dir points at the game root:");
                eprintln!("  modvault config get game.install_dir");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::GameNotConfigured => write!(f, "No game installation configured"),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path, error)
            }
            CliError::Install(e) => write!(f, "Failed to install asset: {}", e),
            CliError::Catalog(e) => write!(f, "Failed to scan installed assets: {}", e),
            CliError::Remote(e) => write!(f, "Failed to query releases: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::FileRead { error, .. } => Some(error),
            CliError::Install(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::Remote(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Install(e)
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<RemoteError> for CliError {
    fn from(e: RemoteError) -> Self {
        CliError::Remote(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
