//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Asset Sync - Install a packaged asset bundle into a writable directory
#[derive(Parser, Debug)]
#[command(name = "asset-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Sync configuration file (.toml, .json, .yaml)
    #[arg(short, long, global = true, env = "ASSET_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Bring the destination up to date with the bundle
    ///
    /// Does nothing when the installed version already matches. Otherwise
    /// the destination is purged, refilled and stamped with the bundled
    /// version.
    ///
    /// Examples:
    ///   asset-sync sync --bundle /opt/game/assets
    ///   asset-sync sync --bundle ./assets --dest ./out/share --fail-fast
    Sync {
        /// Bundle storage directory (contains the bundle root)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Destination root [default: <data dir>/asset-sync/<bundle_root>]
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Abort on the first file that cannot be copied
        #[arg(long)]
        fail_fast: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Compare bundled and installed versions
    Status {
        /// Bundle storage directory (contains the bundle root)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Destination root [default: <data dir>/asset-sync/<bundle_root>]
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Remove the installed tree, marker included
    Purge {
        /// Destination root [default: <data dir>/asset-sync/<bundle_root>]
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },

    /// Generate shell completions
    ///
    /// Outputs completion script for your shell.
    ///
    /// Examples:
    ///   asset-sync completions bash > ~/.local/share/bash-completion/completions/asset-sync
    ///   asset-sync completions zsh > ~/.zfunc/_asset-sync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
