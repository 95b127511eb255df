//! Asset Sync CLI
//!
//! Installs a packaged asset bundle into a writable directory and keeps it
//! at the bundled version.

mod cli;
mod commands;
mod context;
mod error;
mod logging;
mod progress;

use std::path::Path;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.config.as_deref()),
        None => {
            println!("{} Asset Sync CLI", "asset-sync".green().bold());
            println!();
            println!("Run {} for available commands.", "asset-sync --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        Commands::Sync {
            bundle,
            dest,
            fail_fast,
            json,
        } => {
            let config = context::load_config(config_path)?;
            commands::run_sync(&bundle, dest.as_deref(), config, fail_fast, json)
        }
        Commands::Status { bundle, dest, json } => {
            let config = context::load_config(config_path)?;
            commands::run_status(&bundle, dest.as_deref(), config, json)
        }
        Commands::Purge { dest } => {
            let config = context::load_config(config_path)?;
            commands::run_purge(dest.as_deref(), &config)
        }
        Commands::Completions { shell } => cmd_completions(shell),
    }
}

fn cmd_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "asset-sync", &mut std::io::stdout());
    Ok(())
}
