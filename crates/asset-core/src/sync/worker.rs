//! Background execution of a sync run

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::orchestrator::SyncOrchestrator;
use super::outcome::{SyncFailure, SyncOutcome};
use crate::progress::{CopyProgress, ProgressReporter};
use crate::{Error, Result};

/// Notification from the worker thread, delivered in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Copying is about to begin; `total` is the announced leaf count
    Started { total: Option<u64> },
    Progress(CopyProgress),
    /// Always the last event of a run
    Finished(SyncOutcome),
}

impl ProgressReporter for Sender<SyncEvent> {
    fn report(&mut self, completed: u64, label: &str) {
        // A dropped receiver only means nobody is watching.
        let _ = self.send(SyncEvent::Progress(CopyProgress {
            completed,
            label: label.to_string(),
        }));
    }

    fn started(&mut self, total: Option<u64>) {
        let _ = self.send(SyncEvent::Started { total });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn panicked(payload: &(dyn Any + Send)) -> SyncOutcome {
    let err = Error::WorkerPanicked {
        message: panic_message(payload),
    };
    tracing::error!(error = %err, "Sync worker panicked");
    SyncOutcome::Failure(SyncFailure::from(&err))
}

/// Runs a [`SyncOrchestrator`] on a dedicated thread.
pub struct SyncWorker;

impl SyncWorker {
    /// Name of the spawned thread.
    pub const THREAD_NAME: &'static str = "asset-sync";

    /// Start `orchestrator` in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(orchestrator: SyncOrchestrator) -> Result<SyncHandle> {
        let (sender, events) = mpsc::channel();
        let thread = thread::Builder::new()
            .name(Self::THREAD_NAME.to_string())
            .spawn(move || {
                let mut reporter = sender.clone();
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| orchestrator.run(&mut reporter)))
                        .unwrap_or_else(|payload| panicked(payload.as_ref()));
                let _ = sender.send(SyncEvent::Finished(outcome.clone()));
                outcome
            })?;

        Ok(SyncHandle { events, thread })
    }
}

/// Observer side of a background run.
///
/// The event channel closes after [`SyncEvent::Finished`], so iterating
/// [`events`](Self::events) terminates.
pub struct SyncHandle {
    events: Receiver<SyncEvent>,
    thread: JoinHandle<SyncOutcome>,
}

impl SyncHandle {
    pub fn events(&self) -> &Receiver<SyncEvent> {
        &self.events
    }

    /// Block until the run ends and return its outcome.
    pub fn wait(self) -> SyncOutcome {
        self.thread
            .join()
            .unwrap_or_else(|payload| panicked(payload.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::MemoryBundle;
    use crate::config::SyncConfig;
    use asset_fs::NormalizedPath;
    use tempfile::TempDir;

    #[test]
    fn worker_thread_is_named() {
        let temp = TempDir::new().unwrap();
        let orch = SyncOrchestrator::new(
            Box::new(MemoryBundle::new().with_file("share/version.txt", "1")),
            NormalizedPath::new(temp.path()),
            SyncConfig::default(),
        )
        .unwrap();

        let handle = SyncWorker::spawn(orch).unwrap();
        assert_eq!(handle.thread.thread().name(), Some(SyncWorker::THREAD_NAME));
        assert!(handle.wait().is_success());
    }

    #[test]
    fn panic_message_extracts_strings() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }

    #[test]
    fn sender_forwards_progress() {
        let (mut sender, receiver) = mpsc::channel::<SyncEvent>();
        sender.started(Some(1));
        sender.report(1, "a.txt");
        drop(sender);

        let events: Vec<_> = receiver.iter().collect();
        assert_eq!(
            events,
            vec![
                SyncEvent::Started { total: Some(1) },
                SyncEvent::Progress(CopyProgress {
                    completed: 1,
                    label: "a.txt".to_string()
                }),
            ]
        );
    }
}
