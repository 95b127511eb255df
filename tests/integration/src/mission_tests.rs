//! Production scenarios for the asset sync engine
//!
//! Each test walks through one lifecycle an installed application goes
//! through: first launch, upgrade, interrupted upgrade, recovery.

use std::fs;
use std::io::{self, Read};
use std::sync::Mutex;

use asset_core::bundle::{Bundle, BundleEntry, DirBundle, EntryKind, MemoryBundle};
use asset_core::{
    ErrorKind, NoProgress, SyncConfig, SyncOrchestrator, SyncOutcome, SyncWorker, VersionMarker,
};
use asset_fs::NormalizedPath;
use asset_test_utils::{TestBundle, TestDest, assert_mirrors};

static EMBEDDED_FONT: &[u8] = b"\x00\x01\x00\x00 pretend this is a font";

fn sync(bundle: impl Bundle + 'static, dest: &TestDest) -> SyncOutcome {
    SyncOrchestrator::new(Box::new(bundle), dest.normalized(), SyncConfig::default())
        .unwrap()
        .run(&mut NoProgress)
}

/// Bundle that stops working after a fixed number of successful opens.
struct DyingBundle {
    inner: DirBundle,
    opens_left: Mutex<usize>,
}

impl Bundle for DyingBundle {
    fn list(&self, path: &NormalizedPath) -> io::Result<Vec<BundleEntry>> {
        self.inner.list(path)
    }

    fn kind(&self, path: &NormalizedPath) -> io::Result<Option<EntryKind>> {
        self.inner.kind(path)
    }

    fn open(&self, path: &NormalizedPath) -> io::Result<Box<dyn Read + Send + '_>> {
        let mut left = self.opens_left.lock().unwrap();
        if *left == 0 {
            panic!("device ejected while reading {path}");
        }
        *left -= 1;
        self.inner.open(path)
    }
}

#[test]
fn mission_first_launch_with_embedded_assets() {
    let bundle = MemoryBundle::new()
        .with_static("share/version.txt", b"1\n")
        .with_static("share/fonts/mono.ttf", EMBEDDED_FONT)
        .with_file("share/textures/grass.png", vec![3u8; 2048])
        .with_dir("share/screenshots");
    let dest = TestDest::new();

    let outcome = sync(bundle, &dest);

    assert_eq!(outcome.summary().unwrap().files_copied, 2);
    assert_eq!(
        fs::read(dest.path().join("fonts/mono.ttf")).unwrap(),
        EMBEDDED_FONT
    );
    assert!(dest.path().join("screenshots").is_dir());
    assert_eq!(dest.installed_marker().as_deref(), Some("1"));
}

#[test]
fn mission_upgrade_replaces_whole_tree() {
    let dest = TestDest::new();
    let v1 = TestBundle::new()
        .version(1)
        .file("levels/old.map", "old level")
        .file("shared.txt", "v1");
    assert!(sync(DirBundle::open(v1.storage()).unwrap(), &dest).is_success());
    // user data dropped into the install is not preserved either
    fs::write(dest.path().join("levels/notes.txt"), "mine").unwrap();

    let v2 = TestBundle::new()
        .version(2)
        .file("levels/new.map", "new level")
        .file("shared.txt", "v2 is longer");
    let outcome = sync(DirBundle::open(v2.storage()).unwrap(), &dest);

    assert_eq!(outcome.summary().unwrap().version, VersionMarker(2));
    assert_mirrors(&v2.root(), &dest.path(), &["version.txt"], &["version.txt"]);
    dest.assert_file_not_exists("levels/old.map");
    dest.assert_file_not_exists("levels/notes.txt");
}

#[test]
fn mission_interrupted_upgrade_is_redone_on_next_launch() {
    let dest = TestDest::new();
    let v1 = TestBundle::new().version(1).file("a.txt", "v1");
    assert!(sync(DirBundle::open(v1.storage()).unwrap(), &dest).is_success());

    let v2 = TestBundle::new().version(2).many_files(10, 2);

    // the storage dies after four files, on the worker thread
    let dying = DyingBundle {
        inner: DirBundle::open(v2.storage()).unwrap(),
        // the version and count markers take one open each
        opens_left: Mutex::new(6),
    };
    let orchestrator =
        SyncOrchestrator::new(Box::new(dying), dest.normalized(), SyncConfig::default()).unwrap();
    let outcome = SyncWorker::spawn(orchestrator).unwrap().wait();

    assert_eq!(outcome.failure().unwrap().kind, ErrorKind::Internal);
    assert_eq!(dest.installed_marker(), None);
    dest.assert_file_not_exists("a.txt");

    // next launch sees no marker and starts over
    let outcome = sync(DirBundle::open(v2.storage()).unwrap(), &dest);
    assert_eq!(outcome.summary().unwrap().files_copied, 10);
    assert_mirrors(&v2.root(), &dest.path(), &["version.txt"], &["version.txt"]);
}

#[test]
fn mission_corrupted_marker_triggers_reinstall() {
    let bundle = TestBundle::new().version(4).file("a.txt", "a");
    let dest = TestDest::new();
    assert!(sync(DirBundle::open(bundle.storage()).unwrap(), &dest).is_success());

    fs::write(dest.path().join("version.txt"), "\u{0}\u{0}garbage").unwrap();
    fs::remove_file(dest.path().join("a.txt")).unwrap();

    let outcome = sync(DirBundle::open(bundle.storage()).unwrap(), &dest);

    assert!(!outcome.summary().unwrap().up_to_date);
    dest.assert_file_exists("a.txt");
    assert_eq!(dest.installed_marker().as_deref(), Some("4"));
}

#[test]
fn mission_missing_file_is_not_repaired_while_versions_match() {
    let bundle = TestBundle::new().version(4).file("a.txt", "a");
    let dest = TestDest::new();
    assert!(sync(DirBundle::open(bundle.storage()).unwrap(), &dest).is_success());
    fs::remove_file(dest.path().join("a.txt")).unwrap();

    let outcome = sync(DirBundle::open(bundle.storage()).unwrap(), &dest);

    assert!(outcome.summary().unwrap().up_to_date);
    dest.assert_file_not_exists("a.txt");
}
