//! Sync configuration

use std::time::Duration;

use asset_fs::{ConfigStore, NormalizedPath, RobustnessConfig};
use serde::{Deserialize, Serialize};

use crate::copier::CopyPolicy;
use crate::{Error, Result};

/// Marker-write tuning as it appears in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobustnessSettings {
    pub lock_timeout_ms: u64,
    pub enable_fsync: bool,
}

impl Default for RobustnessSettings {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 5_000,
            enable_fsync: true,
        }
    }
}

impl From<RobustnessSettings> for RobustnessConfig {
    fn from(settings: RobustnessSettings) -> Self {
        Self {
            lock_timeout: Duration::from_millis(settings.lock_timeout_ms),
            enable_fsync: settings.enable_fsync,
        }
    }
}

/// Configuration for one sync run.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// bundle_root = "share"
/// policy = "fail-fast"
///
/// [robustness]
/// enable_fsync = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Bundle subtree mirrored into the destination root
    pub bundle_root: String,
    /// Reserved name of the version marker, at the bundle root and at the
    /// destination root
    pub version_file: String,
    /// Reserved name of the leaf-count marker at the bundle root
    pub count_file: String,
    /// Copy buffer size in bytes
    pub buffer_size: usize,
    /// What to do when a single file fails to copy
    pub policy: CopyPolicy,
    pub robustness: RobustnessSettings,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            bundle_root: "share".to_string(),
            version_file: "version.txt".to_string(),
            count_file: "count.txt".to_string(),
            buffer_size: 8 * 1024,
            policy: CopyPolicy::default(),
            robustness: RobustnessSettings::default(),
        }
    }
}

fn validate_marker_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_config(format!("{field} must not be empty")));
    }
    if name.contains(['/', '\\']) {
        return Err(Error::invalid_config(format!(
            "{field} must be a plain file name, got '{name}'"
        )));
    }
    if name == "." || name == ".." {
        return Err(Error::invalid_config(format!("{field} cannot be '{name}'")));
    }
    Ok(())
}

/// `bundle_root` must stay inside the bundle storage and, on the CLI, inside
/// the data directory the default destination is built from.
fn validate_bundle_root(root: &str) -> Result<()> {
    if root.starts_with(['/', '\\']) || root.contains(':') {
        return Err(Error::invalid_config(format!(
            "bundle_root must be a relative path, got '{root}'"
        )));
    }
    if root.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(Error::invalid_config(format!(
            "bundle_root cannot contain '..', got '{root}'"
        )));
    }
    Ok(())
}

impl SyncConfig {
    /// Load and validate a config file (TOML, JSON or YAML by extension).
    pub fn from_file(path: &NormalizedPath) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        validate_bundle_root(&self.bundle_root)?;
        validate_marker_name("version_file", &self.version_file)?;
        validate_marker_name("count_file", &self.count_file)?;
        if self.version_file == self.count_file {
            return Err(Error::invalid_config(
                "version_file and count_file must differ",
            ));
        }
        if self.buffer_size == 0 {
            return Err(Error::invalid_config("buffer_size must be at least 1"));
        }
        Ok(())
    }

    /// The bundle subtree as a path.
    pub fn bundle_root_path(&self) -> NormalizedPath {
        NormalizedPath::new(&self.bundle_root)
    }

    /// Bundle path of the bundled version marker.
    pub fn bundled_version_path(&self) -> NormalizedPath {
        self.bundle_root_path().join(&self.version_file)
    }

    /// Bundle path of the leaf-count marker.
    pub fn bundled_count_path(&self) -> NormalizedPath {
        self.bundle_root_path().join(&self.count_file)
    }

    /// Bundle paths the copier must not copy.
    pub fn reserved_paths(&self) -> [NormalizedPath; 2] {
        [self.bundled_version_path(), self.bundled_count_path()]
    }

    /// Destination path of the installed version marker.
    pub fn installed_version_path(&self, destination: &NormalizedPath) -> NormalizedPath {
        destination.join(&self.version_file)
    }
}
