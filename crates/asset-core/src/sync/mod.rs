//! Sync orchestration
//!
//! This module provides:
//! - **orchestrator**: the check, purge, copy and publish sequence
//! - **outcome**: run states and terminal results
//! - **worker**: background thread with an ordered event channel

mod orchestrator;
mod outcome;
mod worker;

pub use orchestrator::{CLEANUP_LABEL, SyncOrchestrator};
pub use outcome::{SyncFailure, SyncOutcome, SyncState, SyncSummary};
pub use worker::{SyncEvent, SyncHandle, SyncWorker};
