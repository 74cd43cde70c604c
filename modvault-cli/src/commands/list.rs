//! Installed asset listing CLI command.

use modvault::asset::{Asset, AssetCatalog, AssetKind};

use crate::error::CliError;

use super::common::{load_config, require_game};

/// Run the list command.
pub fn run(verbose: bool) -> Result<(), CliError> {
    let config = load_config();
    let game = require_game(&config)?;
    let catalog = AssetCatalog::new(game);

    let assets = catalog.list_all()?;

    if assets.is_empty() {
        println!("No assets installed.");
        return Ok(());
    }

    // list_all groups by kind already: blueprints, savegames, mods.
    let mut current_kind = None;
    for asset in &assets {
        let kind = asset.kind();
        if current_kind != Some(kind) {
            if current_kind.is_some() {
                println!();
            }
            println!("{}", heading(kind));
            current_kind = Some(kind);
        }
        print_asset(asset, verbose);
    }

    println!();
    println!("{} asset(s) installed.", assets.len());

    Ok(())
}

fn heading(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Blueprint => "Blueprints:",
        AssetKind::Savegame => "Savegames:",
        AssetKind::Mod => "Mods:",
    }
}

fn print_asset(asset: &Asset, verbose: bool) {
    match asset {
        Asset::Blueprint(file) | Asset::Savegame(file) => {
            if verbose {
                println!("  {} ({})", file.id, file.path.display());
            } else {
                println!("  {}", file.id);
            }
        }
        Asset::Mod(module) => {
            let mut details = Vec::new();
            if let Some(tag) = &module.tag {
                details.push(tag.clone());
            }
            if module.development {
                details.push("development".to_string());
            }
            if !module.enabled {
                details.push("disabled".to_string());
            }

            if details.is_empty() {
                println!("  {}", module.name);
            } else {
                println!("  {} ({})", module.name, details.join(", "));
            }

            if verbose {
                if let Some(repository) = &module.repository {
                    println!("    source: {}", repository);
                }
                println!("    path:   {}", module.path.display());
            }
        }
    }
}
