//! On-disk directory as bundle storage

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

use asset_fs::NormalizedPath;

use super::{Bundle, BundleEntry, EntryKind};
use crate::{Error, Result};

/// A directory on disk, read but never written.
///
/// Symbolic links inside the bundle are followed, so a linked directory is
/// copied as a directory. A link to a directory that is already being
/// listed further up the same path is left out of the listing.
#[derive(Debug, Clone)]
pub struct DirBundle {
    root: PathBuf,
}

impl DirBundle {
    /// Open `root` as bundle storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BundleUnreadable`] if `root` is not a readable
    /// directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        match fs::metadata(&root) {
            Ok(metadata) if metadata.is_dir() => Ok(Self { root }),
            Ok(_) => Err(Error::unreadable(format!(
                "{} is not a directory",
                root.display()
            ))),
            Err(e) => Err(Error::unreadable(format!("{}: {}", root.display(), e))),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &NormalizedPath) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path.to_native())
        }
    }

    fn classify(&self, dir: &NormalizedPath, entry: &fs::DirEntry) -> io::Result<Option<EntryKind>> {
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            return Ok(Some(EntryKind::Directory));
        }
        if !file_type.is_symlink() {
            return Ok(Some(EntryKind::File));
        }
        // a dangling link stays a leaf and fails when opened
        let target = match fs::canonicalize(entry.path()) {
            Ok(target) if target.is_dir() => target,
            _ => return Ok(Some(EntryKind::File)),
        };
        if self.is_ancestor_of(dir, &target) {
            tracing::warn!(
                link = %entry.path().display(),
                target = %target.display(),
                "Skipping symlink that loops back into the bundle"
            );
            return Ok(None);
        }
        Ok(Some(EntryKind::Directory))
    }

    /// True when `target` is `dir` or one of its ancestors up to the root.
    fn is_ancestor_of(&self, dir: &NormalizedPath, target: &Path) -> bool {
        let mut current = Some(dir.clone());
        while let Some(path) = current {
            if fs::canonicalize(self.resolve(&path)).is_ok_and(|resolved| resolved == target) {
                return true;
            }
            current = path.parent();
        }
        false
    }
}

fn entry_name(entry: &fs::DirEntry) -> String {
    match entry.file_name().into_string() {
        Ok(name) => name,
        Err(raw) => {
            let lossy = raw.to_string_lossy().into_owned();
            tracing::warn!(
                path = %entry.path().display(),
                listed_as = %lossy,
                "Bundle entry name is not valid UTF-8; it will fail to open"
            );
            lossy
        }
    }
}

impl Bundle for DirBundle {
    fn list(&self, path: &NormalizedPath) -> io::Result<Vec<BundleEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.resolve(path))? {
            let entry = entry?;
            if let Some(kind) = self.classify(path, &entry)? {
                entries.push(BundleEntry::new(path.join(&entry_name(&entry)), kind));
            }
        }
        Ok(entries)
    }

    fn kind(&self, path: &NormalizedPath) -> io::Result<Option<EntryKind>> {
        match fs::metadata(self.resolve(path)) {
            Ok(metadata) if metadata.is_dir() => Ok(Some(EntryKind::Directory)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn open(&self, path: &NormalizedPath) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(File::open(self.resolve(path))?))
    }

    fn describe(&self) -> String {
        format!("directory bundle at {}", self.root.display())
    }
}
