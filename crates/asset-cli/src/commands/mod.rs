//! Command implementations for asset-cli

pub mod purge;
pub mod status;
pub mod sync;

pub use purge::run_purge;
pub use status::run_status;
pub use sync::run_sync;
