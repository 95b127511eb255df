//! Error types for asset-core

use std::path::PathBuf;

use serde::Serialize;

/// Result type for asset-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing a bundle
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bundle storage cannot be opened or its root cannot be listed
    #[error("Bundle unreadable: {reason}")]
    BundleUnreadable { reason: String },

    /// A directory inside the bundle could not be listed
    #[error("Failed to list bundle entry {path}: {source}")]
    BundleRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A version or count marker could not be read or parsed
    #[error("Failed to read version marker {path}: {reason}")]
    VersionRead { path: String, reason: String },

    /// A single leaf entry could not be copied
    #[error("Failed to copy {path}: {source}")]
    FileCopy {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The destination root could not be purged, created or marked
    #[error("Cannot write destination {path}: {reason}")]
    DestinationWrite { path: PathBuf, reason: String },

    /// Configuration failed validation
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The run was cancelled between leaf copies
    #[error("Sync cancelled")]
    Cancelled,

    /// The worker thread panicked
    #[error("Sync worker panicked: {message}")]
    WorkerPanicked { message: String },

    /// Filesystem error from asset-fs
    #[error(transparent)]
    Fs(#[from] asset_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`], stable enough to report to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    BundleUnreadable,
    VersionReadFailure,
    FileCopyFailure,
    DestinationWriteFailure,
    InvalidConfig,
    Cancelled,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::BundleUnreadable => "bundle unreadable",
            Self::VersionReadFailure => "version read failure",
            Self::FileCopyFailure => "file copy failure",
            Self::DestinationWriteFailure => "destination write failure",
            Self::InvalidConfig => "invalid configuration",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal error",
        };
        f.write_str(name)
    }
}

impl Error {
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::BundleUnreadable {
            reason: reason.into(),
        }
    }

    pub fn destination(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::DestinationWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BundleUnreadable { .. } | Self::BundleRead { .. } => ErrorKind::BundleUnreadable,
            Self::VersionRead { .. } => ErrorKind::VersionReadFailure,
            Self::FileCopy { .. } => ErrorKind::FileCopyFailure,
            Self::DestinationWrite { .. } | Self::Fs(_) | Self::Io(_) => {
                ErrorKind::DestinationWriteFailure
            }
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::WorkerPanicked { .. } => ErrorKind::Internal,
        }
    }

    /// Whether this error ends a run under the default skip-and-continue
    /// policy. Version read and per-file copy failures do not.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::VersionReadFailure | ErrorKind::FileCopyFailure
        )
    }
}
