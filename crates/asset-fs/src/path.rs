//! Normalized path handling for bundle and destination paths

use std::path::{Path, PathBuf};

/// A path normalized to use single forward slashes internally.
///
/// Bundle storage addresses entries with `/`-separated relative paths
/// (`share/textures/stone.png`) while the destination lives on the native
/// filesystem. Both are carried as `NormalizedPath` so that joining,
/// prefix stripping and label generation behave identically everywhere;
/// conversion to a native `PathBuf` happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

/// Collapse separators: backslashes become `/`, runs of `/` become one and a
/// trailing `/` is dropped. A leading `/` is kept.
fn collapse(raw: &str) -> String {
    let raw = raw.replace('\\', "/");
    let absolute = raw.starts_with('/');
    let joined = raw
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: collapse(&path.as_ref().to_string_lossy()),
        }
    }

    /// The empty relative path (the bundle storage root).
    pub fn empty() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// True for the empty relative path.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// An empty segment leaves the path unchanged.
    pub fn join(&self, segment: &str) -> Self {
        let segment = collapse(segment);
        let segment = segment.trim_start_matches('/');
        if segment.is_empty() {
            return self.clone();
        }
        let inner = if self.inner.is_empty() {
            segment.to_string()
        } else if self.inner == "/" {
            format!("/{segment}")
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner }
    }

    /// Strip `prefix` from the front of this path, on a component boundary.
    ///
    /// Returns `None` when this path does not live under `prefix`. Stripping
    /// a path from itself yields the empty string.
    pub fn strip_prefix(&self, prefix: &NormalizedPath) -> Option<&str> {
        if prefix.inner.is_empty() {
            return Some(&self.inner);
        }
        if prefix.inner == "/" {
            return self.inner.strip_prefix('/');
        }
        let rest = self.inner.strip_prefix(prefix.inner.as_str())?;
        if rest.is_empty() {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) if idx > 0 => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None if !self.inner.is_empty() => Some(Self::empty()),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Number of `/`-separated components.
    pub fn depth(&self) -> usize {
        self.inner.split('/').filter(|s| !s.is_empty()).count()
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
