//! In-memory bundle storage

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::{self, Cursor, ErrorKind, Read};

use asset_fs::NormalizedPath;

use super::{Bundle, BundleEntry, EntryKind};

#[derive(Debug, Clone)]
enum Node {
    Directory,
    File(Cow<'static, [u8]>),
}

/// Bundle held entirely in memory.
///
/// Suitable for assets compiled into the binary:
///
/// ```
/// use asset_core::bundle::MemoryBundle;
///
/// static VERSION: &[u8] = b"3\n";
/// let bundle = MemoryBundle::new()
///     .with_static("share/version.txt", VERSION)
///     .with_file("share/a/x.txt", b"0123456789".to_vec());
/// ```
///
/// Parent directories are created implicitly. Inserting a file at a path
/// that is already a directory (or under a file) replaces the old entry.
#[derive(Debug, Clone)]
pub struct MemoryBundle {
    nodes: BTreeMap<NormalizedPath, Node>,
}

impl Default for MemoryBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBundle {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(NormalizedPath::empty(), Node::Directory);
        Self { nodes }
    }

    fn ensure_parents(&mut self, path: &NormalizedPath) {
        let mut parent = path.parent();
        while let Some(dir) = parent {
            parent = dir.parent();
            self.nodes.insert(dir, Node::Directory);
        }
    }

    /// Add a file with owned contents.
    pub fn insert_file(&mut self, path: impl Into<NormalizedPath>, contents: Vec<u8>) {
        let path = path.into();
        self.ensure_parents(&path);
        self.nodes.insert(path, Node::File(Cow::Owned(contents)));
    }

    /// Add a file backed by static data, without copying it.
    pub fn insert_static(&mut self, path: impl Into<NormalizedPath>, contents: &'static [u8]) {
        let path = path.into();
        self.ensure_parents(&path);
        self.nodes.insert(path, Node::File(Cow::Borrowed(contents)));
    }

    /// Add a (possibly empty) directory.
    pub fn insert_dir(&mut self, path: impl Into<NormalizedPath>) {
        let path = path.into();
        self.ensure_parents(&path);
        self.nodes.insert(path, Node::Directory);
    }

    pub fn with_file(mut self, path: impl Into<NormalizedPath>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert_file(path, contents.into());
        self
    }

    pub fn with_static(mut self, path: impl Into<NormalizedPath>, contents: &'static [u8]) -> Self {
        self.insert_static(path, contents);
        self
    }

    pub fn with_dir(mut self, path: impl Into<NormalizedPath>) -> Self {
        self.insert_dir(path);
        self
    }

    /// Number of file entries.
    pub fn file_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| matches!(node, Node::File(_)))
            .count()
    }

    /// Names of the direct children of `path`; empty for files and for
    /// missing paths. This is the name-only view used by [`super::ListingBundle`].
    pub fn child_names(&self, path: &NormalizedPath) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|candidate| candidate.parent().as_ref() == Some(path))
            .filter_map(|candidate| candidate.file_name().map(str::to_string))
            .collect()
    }
}

impl Bundle for MemoryBundle {
    fn list(&self, path: &NormalizedPath) -> io::Result<Vec<BundleEntry>> {
        match self.nodes.get(path) {
            Some(Node::Directory) => {}
            Some(Node::File(_)) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("{path} is not a directory"),
                ));
            }
            None => {
                return Err(io::Error::new(ErrorKind::NotFound, format!("{path} not found")));
            }
        }

        Ok(self
            .nodes
            .iter()
            .filter(|(candidate, _)| candidate.parent().as_ref() == Some(path))
            .map(|(candidate, node)| {
                let kind = match node {
                    Node::Directory => EntryKind::Directory,
                    Node::File(_) => EntryKind::File,
                };
                BundleEntry::new(candidate.clone(), kind)
            })
            .collect())
    }

    fn kind(&self, path: &NormalizedPath) -> io::Result<Option<EntryKind>> {
        Ok(self.nodes.get(path).map(|node| match node {
            Node::Directory => EntryKind::Directory,
            Node::File(_) => EntryKind::File,
        }))
    }

    fn open(&self, path: &NormalizedPath) -> io::Result<Box<dyn Read + Send + '_>> {
        match self.nodes.get(path) {
            Some(Node::File(contents)) => Ok(Box::new(Cursor::new(contents.as_ref()))),
            Some(Node::Directory) => Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("{path} is a directory"),
            )),
            None => Err(io::Error::new(ErrorKind::NotFound, format!("{path} not found"))),
        }
    }

    fn describe(&self) -> String {
        format!("in-memory bundle ({} files)", self.file_count())
    }
}
