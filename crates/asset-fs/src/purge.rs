//! Recursive removal of destination trees

use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::path::Path;

use crate::{Error, NormalizedPath, Result};

/// Counts of entries removed by [`purge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeStats {
    pub files: usize,
    pub directories: usize,
}

impl PurgeStats {
    pub fn total(&self) -> usize {
        self.files + self.directories
    }
}

/// Remove `root` and everything beneath it.
///
/// Children are removed before their parent directory. Symbolic links are
/// unlinked, never followed. A missing `root` is not an error.
pub fn purge(root: &NormalizedPath) -> Result<PurgeStats> {
    let native = root.to_native();
    let metadata = match fs::symlink_metadata(&native) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %root, "Nothing to purge");
            return Ok(PurgeStats::default());
        }
        Err(e) => return Err(Error::io(&native, e)),
    };

    let mut stats = PurgeStats::default();
    remove_entry(&native, &metadata, &mut stats)?;
    tracing::debug!(
        path = %root,
        files = stats.files,
        directories = stats.directories,
        "Purged tree"
    );
    Ok(stats)
}

fn remove_entry(path: &Path, metadata: &Metadata, stats: &mut PurgeStats) -> Result<()> {
    if !metadata.is_dir() {
        fs::remove_file(path).map_err(|e| Error::io(path, e))?;
        stats.files += 1;
        return Ok(());
    }

    for entry in fs::read_dir(path).map_err(|e| Error::io(path, e))? {
        let entry = entry.map_err(|e| Error::io(path, e))?;
        let child = entry.path();
        // DirEntry::metadata does not traverse symlinks
        let child_metadata = entry.metadata().map_err(|e| Error::io(&child, e))?;
        remove_entry(&child, &child_metadata, stats)?;
    }

    fs::remove_dir(path).map_err(|e| Error::io(path, e))?;
    stats.directories += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purge_counts_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("share");
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/x.txt"), "x").unwrap();
        fs::write(root.join("y.txt"), "y").unwrap();

        let stats = purge(&NormalizedPath::new(&root)).unwrap();

        assert_eq!(stats, PurgeStats { files: 2, directories: 3 });
        assert_eq!(stats.total(), 5);
        assert!(!root.exists());
    }

    #[test]
    fn purge_missing_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let stats = purge(&NormalizedPath::new(dir.path().join("gone"))).unwrap();
        assert_eq!(stats, PurgeStats::default());
    }
}
