//! Asset bundle version-sync engine
//!
//! Mirrors a read-only asset bundle into a writable destination directory
//! whenever the bundled version differs from the installed one:
//!
//! - **Bundle storage**: explicit directory/file classification over disk,
//!   memory or name-only storage
//! - **Version oracle**: bundled and installed version markers
//! - **Tree copier**: depth-first streaming copy with progress accounting
//! - **Orchestrator**: check, purge, copy, then publish the marker last
//! - **Worker**: background thread with an ordered event channel
//!
//! # Architecture
//!
//! ```text
//!                  SyncWorker
//!                      |
//!               SyncOrchestrator
//!                      |
//!     +----------+-----+------+-------------+
//!     |          |            |             |
//! VersionOracle TreeCopier  asset_fs::purge  ProgressReporter
//!     |          |
//!     +----+-----+
//!          |
//!   BundleEnumerator
//!          |
//!       Bundle
//! ```
//!
//! # Example
//!
//! ```no_run
//! use asset_core::bundle::DirBundle;
//! use asset_core::{SyncConfig, SyncOrchestrator};
//! use asset_fs::NormalizedPath;
//!
//! fn example() -> asset_core::Result<()> {
//!     let bundle = DirBundle::open("/opt/game/assets")?;
//!     let orchestrator = SyncOrchestrator::new(
//!         Box::new(bundle),
//!         NormalizedPath::new("/home/me/.local/share/game/share"),
//!         SyncConfig::default(),
//!     )?;
//!     let outcome = orchestrator.run(&mut |count: u64, label: &str| {
//!         println!("{count} {label}");
//!     });
//!     assert!(outcome.is_success());
//!     Ok(())
//! }
//! ```

pub mod bundle;
pub mod config;
pub mod copier;
pub mod enumerator;
pub mod error;
pub mod progress;
pub mod sync;
pub mod version;

pub use bundle::{AssetLister, Bundle, BundleEntry, DirBundle, EntryKind, ListingBundle, MemoryBundle};
pub use config::{RobustnessSettings, SyncConfig};
pub use copier::{CancelToken, CopyPolicy, CopyStats, TreeCopier};
pub use enumerator::BundleEnumerator;
pub use error::{Error, ErrorKind, Result};
pub use progress::{CopyProgress, NoProgress, ProgressReporter};
pub use sync::{
    CLEANUP_LABEL, SyncEvent, SyncFailure, SyncHandle, SyncOrchestrator, SyncOutcome, SyncState,
    SyncSummary, SyncWorker,
};
pub use version::{VersionMarker, VersionOracle, write_installed_version};
