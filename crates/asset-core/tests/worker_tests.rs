//! Tests for the background sync worker

use std::io::{self, Read};

use asset_core::bundle::{Bundle, BundleEntry, EntryKind, MemoryBundle};
use asset_core::{
    CLEANUP_LABEL, CopyProgress, ErrorKind, SyncConfig, SyncEvent, SyncOrchestrator, SyncWorker,
};
use asset_fs::NormalizedPath;
use asset_test_utils::TestDest;
use pretty_assertions::assert_eq;

struct PanickingBundle(MemoryBundle);

impl Bundle for PanickingBundle {
    fn list(&self, path: &NormalizedPath) -> io::Result<Vec<BundleEntry>> {
        self.0.list(path)
    }

    fn kind(&self, path: &NormalizedPath) -> io::Result<Option<EntryKind>> {
        self.0.kind(path)
    }

    fn open(&self, path: &NormalizedPath) -> io::Result<Box<dyn Read + Send + '_>> {
        if path.as_str().ends_with(".bin") {
            panic!("storage driver crashed on {path}");
        }
        self.0.open(path)
    }
}

fn spawn(bundle: impl Bundle + 'static, dest: &TestDest) -> asset_core::SyncHandle {
    let orchestrator =
        SyncOrchestrator::new(Box::new(bundle), dest.normalized(), SyncConfig::default()).unwrap();
    SyncWorker::spawn(orchestrator).unwrap()
}

#[test]
fn test_events_arrive_in_copy_order() {
    let bundle = MemoryBundle::new()
        .with_file("share/version.txt", "3")
        .with_file("share/count.txt", "2")
        .with_file("share/a/x.txt", "0123456789")
        .with_file("share/b.txt", "01234");
    let dest = TestDest::new();

    let handle = spawn(bundle, &dest);
    let events: Vec<SyncEvent> = handle.events().iter().collect();
    let outcome = handle.wait();

    assert_eq!(
        events,
        vec![
            SyncEvent::Started { total: Some(2) },
            SyncEvent::Progress(CopyProgress {
                completed: 0,
                label: CLEANUP_LABEL.to_string()
            }),
            SyncEvent::Progress(CopyProgress {
                completed: 1,
                label: "a/x.txt".to_string()
            }),
            SyncEvent::Progress(CopyProgress {
                completed: 2,
                label: "b.txt".to_string()
            }),
            SyncEvent::Finished(outcome.clone()),
        ]
    );
    assert!(outcome.is_success());
}

#[test]
fn test_noop_run_sends_only_finished() {
    let bundle = MemoryBundle::new().with_file("share/version.txt", "7");
    let dest = TestDest::new().with_installed_version(7);

    let handle = spawn(bundle, &dest);
    let events: Vec<SyncEvent> = handle.events().iter().collect();

    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], SyncEvent::Finished(outcome) if outcome.is_success()));
    assert!(handle.wait().summary().unwrap().up_to_date);
}

#[test]
fn test_panic_becomes_failure_and_marker_stays_absent() {
    let bundle = PanickingBundle(
        MemoryBundle::new()
            .with_file("share/version.txt", "1")
            .with_file("share/data.bin", "boom"),
    );
    let dest = TestDest::new();

    let handle = spawn(bundle, &dest);
    let events: Vec<SyncEvent> = handle.events().iter().collect();
    let outcome = handle.wait();

    let failure = outcome.failure().unwrap();
    assert_eq!(failure.kind, ErrorKind::Internal);
    assert!(failure.message.contains("storage driver crashed"));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SyncEvent::Finished(_)))
            .count(),
        1
    );
    assert!(matches!(events.last(), Some(SyncEvent::Finished(_))));
    assert_eq!(dest.installed_marker(), None);
}

#[test]
fn test_wait_without_draining_events() {
    let bundle = MemoryBundle::new()
        .with_file("share/version.txt", "2")
        .with_file("share/a.txt", "a");
    let dest = TestDest::new();

    let handle = spawn(bundle, &dest);
    let outcome = handle.wait();

    assert!(outcome.is_success());
    dest.assert_file_exists("a.txt");
}
