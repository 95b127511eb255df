//! Bundle enumeration and classification

use asset_fs::NormalizedPath;

use crate::bundle::{Bundle, BundleEntry, EntryKind};
use crate::{Error, Result};

/// Lists and classifies bundle entries for the copier.
///
/// Children are returned sorted by path so that traversal, and therefore
/// progress display, is deterministic for a given bundle.
#[derive(Clone, Copy)]
pub struct BundleEnumerator<'a> {
    bundle: &'a dyn Bundle,
}

impl<'a> BundleEnumerator<'a> {
    pub fn new(bundle: &'a dyn Bundle) -> Self {
        Self { bundle }
    }

    /// Direct children of `path`.
    pub fn list(&self, path: &NormalizedPath) -> Result<Vec<BundleEntry>> {
        let mut entries = self.bundle.list(path).map_err(|source| Error::BundleRead {
            path: path.to_string(),
            source,
        })?;
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    /// Kind of `path` itself. A missing entry is an error.
    pub fn classify(&self, path: &NormalizedPath) -> Result<EntryKind> {
        match self.bundle.kind(path) {
            Ok(Some(kind)) => Ok(kind),
            Ok(None) => Err(Error::BundleRead {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such bundle entry"),
            }),
            Err(source) => Err(Error::BundleRead {
                path: path.to_string(),
                source,
            }),
        }
    }

    /// Verify that `root` is a listable directory before anything
    /// destructive happens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BundleUnreadable`] otherwise.
    pub fn probe(&self, root: &NormalizedPath) -> Result<()> {
        let display = if root.is_empty() { "<root>" } else { root.as_str() };
        match self.bundle.kind(root) {
            Ok(Some(EntryKind::Directory)) => {}
            Ok(Some(EntryKind::File)) => {
                return Err(Error::unreadable(format!(
                    "bundle root '{display}' in {} is not a directory",
                    self.bundle.describe()
                )));
            }
            Ok(None) => {
                return Err(Error::unreadable(format!(
                    "bundle root '{display}' not found in {}",
                    self.bundle.describe()
                )));
            }
            Err(e) => {
                return Err(Error::unreadable(format!(
                    "cannot stat bundle root '{display}': {e}"
                )));
            }
        }

        self.bundle.list(root).map_err(|e| {
            Error::unreadable(format!("cannot list bundle root '{display}': {e}"))
        })?;
        Ok(())
    }
}
