//! Modvault CLI - command-line asset management
//!
//! This binary provides a command-line interface to the modvault library.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use modvault::config::config_directory;
use modvault::logging::{default_log_file, init_logging};

use commands::common::AssetKindArg;
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "modvault")]
#[command(about = "Install game assets and track mod updates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install an asset from a downloaded file
    Install {
        /// Asset kind to install
        #[arg(value_enum)]
        kind: AssetKindArg,

        /// Path to the downloaded file
        file: PathBuf,

        /// Repository the artifact came from, e.g. "owner/name" (mods only)
        #[arg(long, requires = "tag")]
        repository: Option<String>,

        /// Release tag the artifact came from (mods only)
        #[arg(long, requires = "repository")]
        tag: Option<String>,
    },

    /// List installed assets
    List {
        /// Show detailed information
        #[arg(long, short)]
        verbose: bool,
    },

    /// Check installed mods for newer releases
    Check {
        /// Query the remote even if a recent check is on record
        #[arg(long)]
        force: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The guard keeps the background log writer alive until exit.
    let _logging = match init_logging(&config_directory().join("logs"), default_log_file()) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "modvault starting");

    let result = match cli.command {
        Commands::Install {
            kind,
            file,
            repository,
            tag,
        } => commands::install::run(kind, &file, repository, tag).await,
        Commands::List { verbose } => commands::list::run(verbose),
        Commands::Check { force } => commands::check::run(force).await,
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
