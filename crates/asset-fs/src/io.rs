//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Distinguishes temp files of concurrent writers inside one process.
static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Tuning for [`write_atomic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// Total time budget for acquiring the temp-file lock and for retrying
    /// a rename that the OS reports as temporarily denied.
    pub lock_timeout: Duration,
    /// Flush file contents to stable storage before the rename.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

fn retry_policy(timeout: Duration) -> backoff::ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(10))
        .with_max_interval(Duration::from_millis(250))
        .with_max_elapsed_time(Some(timeout))
        .build()
}

fn into_inner<E>(err: backoff::Error<E>) -> E {
    match err {
        backoff::Error::Permanent(e) => e,
        backoff::Error::Transient { err, .. } => err,
    }
}

/// Lock the temp file, write `content` and optionally fsync it.
fn fill_locked(
    file: &mut fs::File,
    content: &[u8],
    config: RobustnessConfig,
    target: &NormalizedPath,
    temp_path: &Path,
) -> Result<()> {
    backoff::retry(retry_policy(config.lock_timeout), || {
        file.try_lock_exclusive().map_err(backoff::Error::transient)
    })
    .map_err(|_| Error::LockFailed {
        path: target.to_native(),
    })?;

    file.write_all(content).map_err(|e| Error::io(temp_path, e))?;

    if config.enable_fsync {
        file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    }

    FileExt::unlock(&*file).map_err(|_| Error::LockFailed {
        path: target.to_native(),
    })
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so a reader (or a process restarted after
/// a crash) observes either the old content or the new content, never a
/// torn value. The temp file lives in the target directory so the rename
/// never crosses filesystems.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_name = format!(
        ".{}.{}.{}.tmp",
        path.file_name().unwrap_or_default(),
        std::process::id(),
        TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = fill_locked(&mut temp_file, content, config, path, &temp_path);
    drop(temp_file);

    let renamed = written.and_then(|()| {
        backoff::retry(retry_policy(config.lock_timeout), || {
            fs::rename(&temp_path, &native_path).map_err(|e| {
                if e.kind() == ErrorKind::PermissionDenied {
                    backoff::Error::transient(e)
                } else {
                    backoff::Error::permanent(e)
                }
            })
        })
        .map_err(|e| Error::io(&native_path, into_inner(e)))
    });

    if renamed.is_err()
        && let Err(e) = fs::remove_file(&temp_path)
    {
        tracing::debug!(path = %temp_path.display(), error = %e, "Temp file cleanup failed");
    }

    renamed
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content, mapping a missing file to `None`.
pub fn read_text_opt(path: &NormalizedPath) -> Result<Option<String>> {
    let native_path = path.to_native();
    match fs::read_to_string(&native_path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Write text content to a file atomically with default robustness settings.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())
}
