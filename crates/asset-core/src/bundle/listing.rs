//! Kind inference for name-only storage

use std::io::{self, Read};

use asset_fs::NormalizedPath;

use super::{Bundle, BundleEntry, EntryKind, MemoryBundle};

/// Storage that can only list child names and open entries.
///
/// Listing a file, a missing path or an empty directory all yield an empty
/// sequence; the storage gives no way to tell them apart.
pub trait AssetLister: Send + Sync {
    fn list_names(&self, path: &NormalizedPath) -> io::Result<Vec<String>>;

    fn open_asset(&self, path: &NormalizedPath) -> io::Result<Box<dyn Read + Send + '_>>;
}

/// Adapts an [`AssetLister`] to [`Bundle`] by inferring kinds.
///
/// A path whose listing is non-empty is a directory; anything else is a
/// file. Consequently an empty directory in such storage is classified as a
/// file, opening it fails and it ends up missing at the destination. Prefer
/// a storage that reports kinds directly whenever one is available.
#[derive(Debug, Clone)]
pub struct ListingBundle<L> {
    lister: L,
}

impl<L: AssetLister> ListingBundle<L> {
    pub fn new(lister: L) -> Self {
        Self { lister }
    }

    pub fn into_inner(self) -> L {
        self.lister
    }

    fn infer(&self, path: &NormalizedPath) -> EntryKind {
        match self.lister.list_names(path) {
            Ok(names) if !names.is_empty() => EntryKind::Directory,
            _ => EntryKind::File,
        }
    }
}

impl<L: AssetLister> Bundle for ListingBundle<L> {
    fn list(&self, path: &NormalizedPath) -> io::Result<Vec<BundleEntry>> {
        Ok(self
            .lister
            .list_names(path)?
            .into_iter()
            .map(|name| {
                let child = path.join(&name);
                let kind = self.infer(&child);
                BundleEntry::new(child, kind)
            })
            .collect())
    }

    fn kind(&self, path: &NormalizedPath) -> io::Result<Option<EntryKind>> {
        Ok(Some(self.infer(path)))
    }

    fn open(&self, path: &NormalizedPath) -> io::Result<Box<dyn Read + Send + '_>> {
        self.lister.open_asset(path)
    }

    fn describe(&self) -> String {
        "listing bundle (inferred kinds)".to_string()
    }
}

impl AssetLister for MemoryBundle {
    fn list_names(&self, path: &NormalizedPath) -> io::Result<Vec<String>> {
        Ok(self.child_names(path))
    }

    fn open_asset(&self, path: &NormalizedPath) -> io::Result<Box<dyn Read + Send + '_>> {
        Bundle::open(self, path)
    }
}
