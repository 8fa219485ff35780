//! Seed command handler

use std::path::Path;

use crate::config::Config;
use crate::db::Store;
use crate::services::{LegacyCatalog, ReconcileService};

pub async fn cmd_seed(config: &Config, path: Option<&Path>) -> anyhow::Result<()> {
    let catalog = match path {
        Some(path) => Some(LegacyCatalog::load_from_path(path)?),
        None => LegacyCatalog::load(&config.legacy)?,
    };

    let Some(catalog) = catalog else {
        println!("No legacy data file found. Looked in:");
        for candidate in config.legacy.candidate_paths() {
            println!("  {}", candidate.display());
        }
        return Ok(());
    };

    let store = Store::new(&config.general.database_path).await?;
    let service = ReconcileService::new(store, Some(catalog), false);

    let inserted = service.seed_if_empty().await?;
    if inserted == 0 {
        println!("Nothing imported (catalog already has movies or the file is empty).");
    } else {
        println!("✓ Imported {inserted} movies");
    }

    Ok(())
}
