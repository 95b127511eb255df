//! Status command implementation

use std::path::Path;

use asset_core::{SyncConfig, VersionMarker, VersionOracle};
use colored::Colorize;
use serde::Serialize;

use crate::context;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct StatusReport {
    bundle: String,
    destination: String,
    bundled_version: VersionMarker,
    installed_version: VersionMarker,
    bundled_file_count: Option<u64>,
    needs_sync: bool,
}

/// Run the status command
pub fn run_status(bundle: &Path, dest: Option<&Path>, config: SyncConfig, json: bool) -> Result<()> {
    let destination = context::resolve_destination(dest, &config)?;
    let dir_bundle = context::open_bundle(bundle)?;
    let oracle = VersionOracle::new(&dir_bundle, &config);

    let bundled_version = oracle.bundled_version();
    let installed_version = oracle.installed_version(&destination);
    let report = StatusReport {
        bundle: dir_bundle.root().display().to_string(),
        destination: destination.to_string(),
        bundled_version,
        installed_version,
        bundled_file_count: oracle.bundled_file_count(),
        needs_sync: bundled_version != installed_version,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Asset Status".bold());
    println!();
    println!("{}:      {}", "Bundle".dimmed(), report.bundle);
    println!("{}: {}", "Destination".dimmed(), report.destination);
    println!(
        "{}:     {}",
        "Bundled".dimmed(),
        report.bundled_version.to_string().cyan()
    );
    let installed = if report.installed_version == VersionMarker::UNKNOWN {
        "none".dimmed()
    } else {
        report.installed_version.to_string().cyan()
    };
    println!("{}:   {}", "Installed".dimmed(), installed);
    if let Some(count) = report.bundled_file_count {
        println!("{}:       {}", "Files".dimmed(), count);
    }
    println!();

    if report.needs_sync {
        println!(
            "{} (run {})",
            "Sync needed".yellow(),
            "asset-sync sync".cyan()
        );
    } else {
        println!("{}", "Up to date".green());
    }

    Ok(())
}
