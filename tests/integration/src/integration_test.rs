//! Vertical slice across asset-fs, asset-core and asset-test-utils

use asset_core::bundle::DirBundle;
use asset_core::{
    CopyPolicy, SyncConfig, SyncEvent, SyncOrchestrator, SyncWorker, VersionMarker, VersionOracle,
};
use asset_fs::{ConfigStore, NormalizedPath};
use asset_test_utils::{TestBundle, TestDest, assert_mirrors};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_config_file_drives_background_sync() {
    let config_dir = TempDir::new().unwrap();
    let config_path = NormalizedPath::new(config_dir.path().join("sync.yaml"));
    let written = SyncConfig {
        bundle_root: "data".to_string(),
        buffer_size: 512,
        policy: CopyPolicy::FailFast,
        ..SyncConfig::default()
    };
    ConfigStore::new().save(&config_path, &written).unwrap();
    let config = SyncConfig::from_file(&config_path).unwrap();
    assert_eq!(config, written);

    let bundle = TestBundle::with_root("data")
        .version(12)
        .count(3)
        .file("maps/level1.map", vec![0u8; 3000])
        .file("maps/level2.map", vec![1u8; 2000])
        .file("sounds/boom.ogg", "ogg");
    let dest = TestDest::new();

    let orchestrator = SyncOrchestrator::new(
        Box::new(DirBundle::open(bundle.storage()).unwrap()),
        dest.normalized(),
        config.clone(),
    )
    .unwrap();
    let handle = SyncWorker::spawn(orchestrator).unwrap();
    let events: Vec<SyncEvent> = handle.events().iter().collect();
    let outcome = handle.wait();

    assert!(outcome.is_success());
    assert_eq!(events.first(), Some(&SyncEvent::Started { total: Some(3) }));
    let labels: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            SyncEvent::Progress(p) if p.completed > 0 => Some(p.label.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        labels,
        vec!["maps/level1.map", "maps/level2.map", "sounds/boom.ogg"]
    );
    assert_mirrors(
        &bundle.root(),
        &dest.path(),
        &["version.txt", "count.txt"],
        &["version.txt"],
    );

    let dir_bundle = DirBundle::open(bundle.storage()).unwrap();
    let oracle = VersionOracle::new(&dir_bundle, &config);
    assert_eq!(oracle.installed_version(&dest.normalized()), VersionMarker(12));
    assert!(!oracle.needs_sync(&dest.normalized()));
}

#[test]
fn test_outcome_json_shape() {
    let bundle = TestBundle::new().version(1).file("a.txt", "a");
    let dest = TestDest::new();
    let outcome = SyncOrchestrator::new(
        Box::new(DirBundle::open(bundle.storage()).unwrap()),
        dest.normalized(),
        SyncConfig::default(),
    )
    .unwrap()
    .run(&mut asset_core::NoProgress);

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "status": "success",
            "version": 1,
            "files_copied": 1,
            "up_to_date": false,
        })
    );
}

#[test]
fn test_default_config_round_trips_through_toml() {
    let rendered = toml::to_string(&SyncConfig::default()).unwrap();
    assert!(rendered.contains("policy = \"skip-and-continue\""));
    let parsed: SyncConfig = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed, SyncConfig::default());
}
