//! Run states and terminal outcomes

use std::fmt;

use serde::Serialize;

use crate::error::{Error, ErrorKind};
use crate::version::VersionMarker;

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Version now installed at the destination
    pub version: VersionMarker,
    /// Leaves copied in this run
    pub files_copied: u64,
    /// True when versions already matched and nothing was touched
    pub up_to_date: bool,
}

/// Why a run failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for SyncFailure {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Terminal result of one orchestration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SyncOutcome {
    Success(SyncSummary),
    Failure(SyncFailure),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn summary(&self) -> Option<&SyncSummary> {
        match self {
            Self::Success(summary) => Some(summary),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&SyncFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

/// Orchestrator state machine.
///
/// ```text
/// Idle -> CheckingVersion -> Syncing -> Done
///               |                        ^
///               +------------------------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    CheckingVersion,
    Syncing,
    Done(SyncOutcome),
}

impl SyncState {
    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: &SyncState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::CheckingVersion)
                | (Self::CheckingVersion, Self::Syncing)
                | (Self::CheckingVersion, Self::Done(_))
                | (Self::Syncing, Self::Done(_))
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::CheckingVersion => f.write_str("checking-version"),
            Self::Syncing => f.write_str("syncing"),
            Self::Done(SyncOutcome::Success(_)) => f.write_str("done(success)"),
            Self::Done(SyncOutcome::Failure(_)) => f.write_str("done(failure)"),
        }
    }
}
