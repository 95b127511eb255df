//! Progress reporting contract

use serde::Serialize;

/// Where a run currently stands, as seen by an observer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyProgress {
    /// Leaf entries visited so far in this run
    pub completed: u64,
    /// Bundle-root-relative path of the last visited leaf
    pub label: String,
}

impl CopyProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more visited leaf and return the new count.
    pub fn advance(&mut self, label: impl Into<String>) -> u64 {
        self.completed += 1;
        self.label = label.into();
        self.completed
    }
}

/// Sink for progress notifications.
///
/// Called synchronously on the copying thread, once per visited leaf, with
/// a count that never decreases within a run.
pub trait ProgressReporter {
    fn report(&mut self, completed: u64, label: &str);

    /// Called once before copying starts, with the announced leaf total if
    /// the bundle provides one.
    fn started(&mut self, _total: Option<u64>) {}
}

impl<F> ProgressReporter for F
where
    F: FnMut(u64, &str),
{
    fn report(&mut self, completed: u64, label: &str) {
        self(completed, label)
    }
}

/// Discards all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _completed: u64, _label: &str) {}
}
