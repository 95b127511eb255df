//! [`TestBundle`] builder for on-disk bundle fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary on-disk bundle laid out as `<storage>/<root>/...`.
///
/// # Example
///
/// ```rust,no_run
/// use asset_test_utils::TestBundle;
///
/// let bundle = TestBundle::new()
///     .version(3)
///     .file("a/x.txt", "0123456789")
///     .file("b.txt", "01234");
/// assert!(bundle.root().join("a/x.txt").is_file());
/// ```
pub struct TestBundle {
    temp_dir: TempDir,
    root_name: String,
}

impl Default for TestBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBundle {
    /// Create a bundle whose root subtree is `share`.
    pub fn new() -> Self {
        Self::with_root("share")
    }

    /// Create a bundle whose root subtree is `root_name`.
    pub fn with_root(root_name: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(root_name)).unwrap();
        Self {
            temp_dir,
            root_name: root_name.to_string(),
        }
    }

    /// Storage root, i.e. the directory that contains the bundle root.
    pub fn storage(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Name of the bundle root subtree.
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Absolute path of the bundle root subtree.
    pub fn root(&self) -> PathBuf {
        self.storage().join(&self.root_name)
    }

    /// Add a file under the bundle root, creating parents.
    pub fn file(self, path: &str, contents: impl AsRef<[u8]>) -> Self {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, contents).unwrap();
        self
    }

    /// Add a directory (possibly empty) under the bundle root.
    pub fn dir(self, path: &str) -> Self {
        fs::create_dir_all(self.root().join(path)).unwrap();
        self
    }

    /// Write the bundled version marker (`version.txt`).
    pub fn version(self, version: u64) -> Self {
        self.file("version.txt", format!("{version}\n"))
    }

    /// Write the leaf-count marker (`count.txt`).
    pub fn count(self, count: u64) -> Self {
        self.file("count.txt", format!("{count}\n"))
    }

    /// Write `n` small files named `file_000.txt`, `file_001.txt`, ...
    /// spread over `dirs` subdirectories.
    pub fn many_files(mut self, n: usize, dirs: usize) -> Self {
        let dirs = dirs.max(1);
        for i in 0..n {
            let path = format!("dir_{:02}/file_{i:03}.txt", i % dirs);
            self = self.file(&path, format!("contents of {i}"));
        }
        self
    }
}
