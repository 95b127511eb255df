//! Filesystem layer for asset-sync
//!
//! Provides normalized path handling, atomic marker writes, recursive purge
//! of destination trees and format-agnostic configuration loading.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod purge;

pub use config::{ConfigFormat, ConfigStore};
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::NormalizedPath;
pub use purge::{PurgeStats, purge};
