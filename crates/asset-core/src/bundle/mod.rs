//! Read-only bundle storage
//!
//! A bundle is the packaged, immutable source of assets. Storage backends
//! implement [`Bundle`], which reports the kind of every child directly so
//! that traversal never has to guess whether an entry is a directory:
//!
//! - [`DirBundle`]: an on-disk directory treated as read-only storage
//! - [`MemoryBundle`]: in-memory entries, e.g. assets embedded with
//!   `include_bytes!`
//! - [`ListingBundle`]: adapter for name-only storage that cannot report
//!   kinds; it infers them from listings (see its docs for the limitation)

mod dir;
mod listing;
mod memory;

pub use dir::DirBundle;
pub use listing::{AssetLister, ListingBundle};
pub use memory::MemoryBundle;

use std::io::{self, Read};

use asset_fs::NormalizedPath;

/// Classification of a bundle entry. There is no "unknown" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
}

impl EntryKind {
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// A direct child of a bundle directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleEntry {
    /// Full path from the bundle storage root
    pub path: NormalizedPath,
    pub kind: EntryKind,
}

impl BundleEntry {
    pub fn new(path: NormalizedPath, kind: EntryKind) -> Self {
        Self { path, kind }
    }

    pub fn directory(path: impl Into<NormalizedPath>) -> Self {
        Self::new(path.into(), EntryKind::Directory)
    }

    pub fn file(path: impl Into<NormalizedPath>) -> Self {
        Self::new(path.into(), EntryKind::File)
    }

    /// Last path component.
    pub fn name(&self) -> &str {
        self.path.file_name().unwrap_or_default()
    }
}

/// Read-only bundle storage.
///
/// Paths are relative to the storage root and `/`-separated. The empty path
/// is the storage root itself.
pub trait Bundle: Send + Sync {
    /// List the direct children of the directory at `path`.
    ///
    /// Order is defined by the storage and is not relied on for correctness.
    fn list(&self, path: &NormalizedPath) -> io::Result<Vec<BundleEntry>>;

    /// Kind of the entry at `path`, or `None` if there is no such entry.
    fn kind(&self, path: &NormalizedPath) -> io::Result<Option<EntryKind>>;

    /// Open the leaf entry at `path` for streaming.
    fn open(&self, path: &NormalizedPath) -> io::Result<Box<dyn Read + Send + '_>>;

    /// Short description used in log messages.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<B: Bundle + ?Sized> Bundle for Box<B> {
    fn list(&self, path: &NormalizedPath) -> io::Result<Vec<BundleEntry>> {
        (**self).list(path)
    }

    fn kind(&self, path: &NormalizedPath) -> io::Result<Option<EntryKind>> {
        (**self).kind(path)
    }

    fn open(&self, path: &NormalizedPath) -> io::Result<Box<dyn Read + Send + '_>> {
        (**self).open(path)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Read a whole leaf entry into a string.
pub(crate) fn read_to_string(bundle: &dyn Bundle, path: &NormalizedPath) -> io::Result<String> {
    let mut content = String::new();
    bundle.open(path)?.read_to_string(&mut content)?;
    Ok(content)
}
