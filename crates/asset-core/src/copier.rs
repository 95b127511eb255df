//! Depth-first bundle-to-disk tree copy

use std::fs;
use std::io::{self, ErrorKind, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use asset_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::bundle::{Bundle, EntryKind};
use crate::enumerator::BundleEnumerator;
use crate::progress::{CopyProgress, ProgressReporter};
use crate::{Error, Result};

/// Default copy buffer size.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// How the copier reacts to a leaf that fails to copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CopyPolicy {
    /// Log the failure, count the leaf as visited and keep going
    #[default]
    SkipAndContinue,
    /// Abort the traversal on the first failure
    FailFast,
}

/// Shared flag that stops a copy between two leaves.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters kept across every `copy` call on one copier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyStats {
    /// Leaves visited, whether or not they copied
    pub visited: u64,
    pub copied: u64,
    pub failed: u64,
    /// Directories created at the destination
    pub directories: u64,
    pub bytes: u64,
}

/// Replicates a bundle subtree into a destination directory.
///
/// Traversal is depth-first preorder with children in name order. Every
/// visited leaf advances the shared [`CopyProgress`] by one and is reported
/// with its path relative to the label root.
pub struct TreeCopier<'a> {
    bundle: &'a dyn Bundle,
    label_root: NormalizedPath,
    skip: Vec<NormalizedPath>,
    policy: CopyPolicy,
    cancel: Option<CancelToken>,
    buffer: Vec<u8>,
    stats: CopyStats,
}

impl<'a> TreeCopier<'a> {
    /// Create a copier whose progress labels are relative to `label_root`.
    pub fn new(bundle: &'a dyn Bundle, label_root: NormalizedPath) -> Self {
        Self {
            bundle,
            label_root,
            skip: Vec::new(),
            policy: CopyPolicy::default(),
            cancel: None,
            buffer: vec![0; DEFAULT_BUFFER_SIZE],
            stats: CopyStats::default(),
        }
    }

    /// Use a `size`-byte buffer; zero is treated as one.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer = vec![0; size.max(1)];
        self
    }

    pub fn with_policy(mut self, policy: CopyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Never copy these bundle paths. Skipped leaves are not counted.
    pub fn skipping(mut self, paths: impl IntoIterator<Item = NormalizedPath>) -> Self {
        self.skip.extend(paths);
        self
    }

    pub fn stats(&self) -> CopyStats {
        self.stats
    }

    /// Copy `bundle_path` to `destination` and return the number of leaves
    /// copied successfully.
    ///
    /// # Errors
    ///
    /// Fails if `bundle_path` is missing or, when it is a directory, if it
    /// cannot be listed or `destination` cannot be created. Failures below
    /// the top level only abort under [`CopyPolicy::FailFast`]. A set cancel
    /// token yields [`Error::Cancelled`].
    pub fn copy(
        &mut self,
        bundle_path: &NormalizedPath,
        destination: &NormalizedPath,
        progress: &mut CopyProgress,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<u64> {
        let before = self.stats.copied;
        match BundleEnumerator::new(self.bundle).classify(bundle_path)? {
            EntryKind::Directory => {
                self.create_dir(destination)?;
                let children = BundleEnumerator::new(self.bundle).list(bundle_path)?;
                for child in children {
                    let target = destination.join(child.name());
                    self.copy_entry(&child.path, child.kind, &target, progress, reporter)?;
                }
            }
            EntryKind::File => self.copy_leaf(bundle_path, destination, progress, reporter)?,
        }
        Ok(self.stats.copied - before)
    }

    fn copy_entry(
        &mut self,
        path: &NormalizedPath,
        kind: EntryKind,
        destination: &NormalizedPath,
        progress: &mut CopyProgress,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<()> {
        match kind {
            EntryKind::File => self.copy_leaf(path, destination, progress, reporter),
            EntryKind::Directory => {
                if let Err(e) = self.create_dir(destination) {
                    self.tolerate(e)?;
                }
                let children = match BundleEnumerator::new(self.bundle).list(path) {
                    Ok(children) => children,
                    Err(e) => return self.tolerate(e),
                };
                for child in children {
                    let target = destination.join(child.name());
                    self.copy_entry(&child.path, child.kind, &target, progress, reporter)?;
                }
                Ok(())
            }
        }
    }

    /// Log a non-fatal error, or return it under fail-fast.
    fn tolerate(&self, err: Error) -> Result<()> {
        match self.policy {
            CopyPolicy::FailFast => Err(err),
            CopyPolicy::SkipAndContinue => {
                tracing::warn!(error = %err, "Skipping bundle entry");
                Ok(())
            }
        }
    }

    fn create_dir(&mut self, destination: &NormalizedPath) -> Result<()> {
        if destination.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(destination.to_native())
            .map_err(|e| Error::destination(destination.to_native(), e))?;
        self.stats.directories += 1;
        Ok(())
    }

    fn copy_leaf(
        &mut self,
        path: &NormalizedPath,
        destination: &NormalizedPath,
        progress: &mut CopyProgress,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<()> {
        if self.skip.contains(path) {
            tracing::debug!(path = %path, "Skipping reserved marker");
            return Ok(());
        }
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(Error::Cancelled);
        }

        self.stats.visited += 1;
        match self.stream(path, destination) {
            Ok(bytes) => {
                self.stats.copied += 1;
                self.stats.bytes += bytes;
                tracing::debug!(path = %path, bytes, "Copied");
            }
            Err(source) => {
                self.stats.failed += 1;
                let err = Error::FileCopy {
                    path: path.to_string(),
                    source,
                };
                if self.policy == CopyPolicy::FailFast {
                    return Err(err);
                }
                tracing::warn!(error = %err, "Leaving entry out of the destination");
            }
        }

        let label = path.strip_prefix(&self.label_root).unwrap_or(path.as_str());
        let completed = progress.advance(label);
        reporter.report(completed, &progress.label);
        Ok(())
    }

    /// Open the source before touching the destination, so a leaf that
    /// cannot be read leaves nothing behind.
    fn stream(&mut self, path: &NormalizedPath, destination: &NormalizedPath) -> io::Result<u64> {
        let bundle = self.bundle;
        let mut reader = bundle.open(path)?;
        let mut writer = fs::File::create(destination.to_native())?;
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut self.buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            writer.write_all(&self.buffer[..n])?;
            total += n as u64;
        }
        writer.flush()?;
        Ok(total)
    }
}
