//! [`TestDest`] destination directory fixture.

use std::fs;
use std::path::{Path, PathBuf};

use asset_fs::NormalizedPath;
use tempfile::TempDir;

/// A temporary destination root at `<temp>/share`, not created until
/// something is written to it.
pub struct TestDest {
    temp_dir: TempDir,
}

impl Default for TestDest {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDest {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// The destination root.
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("share")
    }

    /// The destination root as a [`NormalizedPath`].
    pub fn normalized(&self) -> NormalizedPath {
        NormalizedPath::new(self.path())
    }

    /// Directory that contains the destination root.
    pub fn parent(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Pre-populate a file, as left behind by an older installation.
    pub fn with_file(self, path: &str, contents: impl AsRef<[u8]>) -> Self {
        let full_path = self.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, contents).unwrap();
        self
    }

    /// Pre-populate the installed version marker.
    pub fn with_installed_version(self, version: u64) -> Self {
        self.with_file("version.txt", version.to_string())
    }

    /// Raw contents of the installed marker, if present.
    pub fn installed_marker(&self) -> Option<String> {
        fs::read_to_string(self.path().join("version.txt")).ok()
    }

    /// Assert that `path` (relative to the destination root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the destination root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Length in bytes of the file at `path`.
    ///
    /// # Panics
    /// Panics if the file cannot be inspected.
    pub fn file_len(&self, path: &str) -> u64 {
        let full_path = self.path().join(path);
        fs::metadata(&full_path)
            .unwrap_or_else(|_| panic!("Could not stat file: {}", full_path.display()))
            .len()
    }
}
