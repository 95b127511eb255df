//! Sync command implementation

use std::path::Path;

use asset_core::{CopyPolicy, SyncConfig, SyncEvent, SyncOrchestrator, SyncOutcome, SyncWorker};
use asset_fs::NormalizedPath;
use colored::Colorize;
use serde::Serialize;

use crate::context;
use crate::error::{CliError, Result};
use crate::progress::ProgressDisplay;

#[derive(Serialize)]
struct SyncReport<'a> {
    destination: &'a str,
    #[serde(flatten)]
    outcome: &'a SyncOutcome,
}

/// Run the sync command
pub fn run_sync(
    bundle: &Path,
    dest: Option<&Path>,
    mut config: SyncConfig,
    fail_fast: bool,
    json: bool,
) -> Result<()> {
    if fail_fast {
        config.policy = CopyPolicy::FailFast;
    }
    let destination = context::resolve_destination(dest, &config)?;
    let bundle = context::open_bundle(bundle)?;
    let orchestrator = SyncOrchestrator::new(Box::new(bundle), destination.clone(), config)?;

    let handle = SyncWorker::spawn(orchestrator)?;
    let mut display = ProgressDisplay::new(json);
    for event in handle.events().iter() {
        match event {
            SyncEvent::Started { total } => display.start(total),
            SyncEvent::Progress(progress) => display.update(&progress),
            SyncEvent::Finished(_) => break,
        }
    }
    let outcome = handle.wait();

    if outcome.is_success() {
        display.finish();
    } else {
        display.abandon();
    }

    if json {
        let report = SyncReport {
            destination: destination.as_str(),
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_outcome(&destination, &outcome);
    }

    match outcome {
        SyncOutcome::Success(_) => Ok(()),
        SyncOutcome::Failure(failure) => Err(CliError::user(format!("Sync failed: {failure}"))),
    }
}

fn print_outcome(destination: &NormalizedPath, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Success(summary) if summary.up_to_date => {
            println!(
                "{} Assets already at version {} in {}",
                "OK".green().bold(),
                summary.version.to_string().cyan(),
                destination
            );
        }
        SyncOutcome::Success(summary) => {
            println!(
                "{} Installed version {} ({} files) into {}",
                "OK".green().bold(),
                summary.version.to_string().cyan(),
                summary.files_copied,
                destination
            );
        }
        SyncOutcome::Failure(failure) => {
            println!(
                "{} {} ({})",
                "FAILED".red().bold(),
                failure.message,
                failure.kind.to_string().dimmed()
            );
        }
    }
}
