//! Bundled and installed version markers

use std::fmt;
use std::str::FromStr;

use asset_fs::{NormalizedPath, RobustnessConfig, io};
use serde::{Deserialize, Serialize};

use crate::bundle::{self, Bundle};
use crate::config::SyncConfig;
use crate::{Error, Result};

/// Version identifier of a bundle build.
///
/// Stored on disk as decimal ASCII; surrounding whitespace is ignored.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VersionMarker(pub u64);

impl VersionMarker {
    /// Value used when a marker is absent or unreadable.
    pub const UNKNOWN: Self = Self(0);

    pub fn get(self) -> u64 {
        self.0
    }

    /// Parse marker file contents.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err("marker is empty".to_string());
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("'{trimmed}' is not a decimal integer"));
        }
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|e| format!("'{trimmed}': {e}"))
    }
}

impl FromStr for VersionMarker {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VersionMarker {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Reads both version markers. Never mutates anything.
pub struct VersionOracle<'a> {
    bundle: &'a dyn Bundle,
    config: &'a SyncConfig,
}

impl<'a> VersionOracle<'a> {
    pub fn new(bundle: &'a dyn Bundle, config: &'a SyncConfig) -> Self {
        Self { bundle, config }
    }

    fn read_bundled(&self, path: &NormalizedPath) -> Result<VersionMarker> {
        let text = bundle::read_to_string(self.bundle, path).map_err(|e| Error::VersionRead {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        VersionMarker::parse(&text).map_err(|reason| Error::VersionRead {
            path: path.to_string(),
            reason,
        })
    }

    /// Version embedded in the bundle, or [`VersionMarker::UNKNOWN`] if it
    /// cannot be read.
    pub fn bundled_version(&self) -> VersionMarker {
        let path = self.config.bundled_version_path();
        match self.read_bundled(&path) {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!(kind = %e.kind(), error = %e, "Treating bundled version as 0");
                VersionMarker::UNKNOWN
            }
        }
    }

    /// Number of leaf entries announced by the bundle, if it says.
    pub fn bundled_file_count(&self) -> Option<u64> {
        let path = self.config.bundled_count_path();
        match self.read_bundled(&path) {
            Ok(count) => Some(count.get()),
            Err(e) => {
                tracing::debug!(error = %e, "No usable file count marker");
                None
            }
        }
    }

    /// Version recorded at `destination`. Absent or malformed markers are
    /// [`VersionMarker::UNKNOWN`].
    pub fn installed_version(&self, destination: &NormalizedPath) -> VersionMarker {
        let path = self.config.installed_version_path(destination);
        match io::read_text_opt(&path) {
            Ok(Some(text)) => VersionMarker::parse(&text).unwrap_or_else(|reason| {
                tracing::warn!(path = %path, %reason, "Malformed installed version marker");
                VersionMarker::UNKNOWN
            }),
            Ok(None) => {
                tracing::debug!(path = %path, "No installed version marker");
                VersionMarker::UNKNOWN
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Cannot read installed version marker");
                VersionMarker::UNKNOWN
            }
        }
    }

    /// Whether `destination` must be purged and refilled.
    pub fn needs_sync(&self, destination: &NormalizedPath) -> bool {
        self.bundled_version() != self.installed_version(destination)
    }
}

/// Publish `version` as the installed marker at `destination`.
///
/// The write goes through a temp file and a rename, so an interrupted call
/// leaves the previous marker (or none) in place.
pub fn write_installed_version(
    config: &SyncConfig,
    destination: &NormalizedPath,
    version: VersionMarker,
    robustness: RobustnessConfig,
) -> Result<()> {
    let path = config.installed_version_path(destination);
    io::write_atomic(&path, version.to_string().as_bytes(), robustness)
        .map_err(|e| Error::destination(path.to_native(), e))
}
