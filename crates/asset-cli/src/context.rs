//! Config and path resolution shared by commands

use std::path::{Path, PathBuf};

use asset_core::SyncConfig;
use asset_core::bundle::DirBundle;
use asset_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Directory under the platform data dir that holds installs.
const APP_DIR: &str = "asset-sync";

/// Load `path` if given, otherwise use defaults.
pub fn load_config(path: Option<&Path>) -> Result<SyncConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading sync config");
            Ok(SyncConfig::from_file(&NormalizedPath::new(path))?)
        }
        None => Ok(SyncConfig::default()),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Destination root: `dest` when given, else
/// `<data dir>/asset-sync/<bundle_root>`.
pub fn resolve_destination(dest: Option<&Path>, config: &SyncConfig) -> Result<NormalizedPath> {
    let path = match dest {
        Some(dest) => absolute(dest)?,
        None => dirs::data_dir()
            .ok_or_else(|| CliError::user("No platform data directory found; pass --dest"))?
            .join(APP_DIR)
            .join(&config.bundle_root),
    };
    Ok(NormalizedPath::new(path))
}

/// Open the bundle storage directory at `path`.
pub fn open_bundle(path: &Path) -> Result<DirBundle> {
    let canonical = dunce::canonicalize(path).map_err(|e| {
        CliError::user(format!("Bundle directory {} not found: {e}", path.display()))
    })?;
    Ok(DirBundle::open(canonical)?)
}
