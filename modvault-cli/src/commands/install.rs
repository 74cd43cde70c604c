//! Asset installation CLI command.

use std::path::Path;

use modvault::asset::AssetKind;
use modvault::store::{Artifact, AssetStore, DownloadInfo, NoOpHooks, StoreOutcome};

use crate::error::CliError;

use super::common::{load_config, require_game, AssetKindArg};

/// Run the install command.
pub async fn run(
    kind: AssetKindArg,
    file: &Path,
    repository: Option<String>,
    tag: Option<String>,
) -> Result<(), CliError> {
    let config = load_config();
    let game = require_game(&config)?;

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CliError::Config(format!("'{}' has no usable file name", file.display()))
        })?;

    let bytes = std::fs::read(file).map_err(|error| CliError::FileRead {
        path: file.display().to_string(),
        error,
    })?;

    let kind = AssetKind::from(kind);
    let mut artifact = Artifact::new(kind, file_name, bytes);
    if let (Some(repository), Some(tag)) = (repository, tag) {
        artifact = artifact.with_download(DownloadInfo::new(repository, tag));
    }

    println!("Installing {} from {}...", kind, file.display());

    let store = AssetStore::new(game, NoOpHooks);
    let outcome = store.store(artifact).await?;

    match outcome {
        StoreOutcome::Installed { path } => {
            println!("Installed to {}", path.display());
        }
        StoreOutcome::AlreadyInstalled { path } => {
            println!("Already installed at {}", path.display());
        }
        StoreOutcome::Replaced { path, previous_tag } => match previous_tag {
            Some(previous) => println!("Replaced {} at {}", previous, path.display()),
            None => println!("Replaced previous version at {}", path.display()),
        },
    }

    Ok(())
}
