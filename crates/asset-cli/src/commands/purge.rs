//! Purge command implementation

use std::path::Path;

use asset_core::SyncConfig;
use colored::Colorize;

use crate::context;
use crate::error::Result;

/// Run the purge command
pub fn run_purge(dest: Option<&Path>, config: &SyncConfig) -> Result<()> {
    let destination = context::resolve_destination(dest, config)?;
    if !destination.exists() {
        println!("{} Nothing installed at {}", "OK".green().bold(), destination);
        return Ok(());
    }

    let stats = asset_fs::purge(&destination)?;
    println!(
        "{} Removed {} files and {} directories from {}",
        "OK".green().bold(),
        stats.files,
        stats.directories,
        destination
    );
    Ok(())
}
