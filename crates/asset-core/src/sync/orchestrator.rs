//! SyncOrchestrator implementation

use std::fs;

use asset_fs::NormalizedPath;

use super::outcome::{SyncFailure, SyncOutcome, SyncState, SyncSummary};
use crate::bundle::Bundle;
use crate::config::SyncConfig;
use crate::copier::{CancelToken, TreeCopier};
use crate::enumerator::BundleEnumerator;
use crate::progress::{CopyProgress, ProgressReporter};
use crate::version::{VersionOracle, write_installed_version};
use crate::{Error, Result};

/// Label of the progress report sent before the old tree is purged.
pub const CLEANUP_LABEL: &str = "Cleaning up older installation...";

/// Brings a destination directory up to date with a bundle.
///
/// A run checks both version markers and either stops (they match) or
/// purges the destination, copies the bundle root into it and publishes the
/// bundled version marker as the very last write. A run that fails at any
/// point leaves the marker at its previous value, so the next run starts
/// over.
///
/// [`run`](Self::run) consumes the orchestrator; one instance drives exactly
/// one run.
pub struct SyncOrchestrator {
    bundle: Box<dyn Bundle>,
    destination: NormalizedPath,
    config: SyncConfig,
    cancel: Option<CancelToken>,
    state: SyncState,
}

impl SyncOrchestrator {
    /// Create an orchestrator for one run.
    ///
    /// # Arguments
    ///
    /// * `bundle` - Read-only source storage
    /// * `destination` - Directory that mirrors the bundle root
    /// * `config` - Marker names, buffer size and failure policy
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation.
    pub fn new(
        bundle: Box<dyn Bundle>,
        destination: NormalizedPath,
        config: SyncConfig,
    ) -> Result<Self> {
        config.validate()?;
        if destination.is_empty() {
            return Err(Error::invalid_config("destination must not be empty"));
        }
        Ok(Self {
            bundle,
            destination,
            config,
            cancel: None,
            state: SyncState::Idle,
        })
    }

    /// Allow the run to be stopped from another thread.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn destination(&self) -> &NormalizedPath {
        &self.destination
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run to completion, reporting progress through `reporter`.
    pub fn run(mut self, reporter: &mut dyn ProgressReporter) -> SyncOutcome {
        tracing::info!(
            bundle = %self.bundle.describe(),
            destination = %self.destination,
            "Starting asset sync"
        );
        self.transition(SyncState::CheckingVersion);

        let outcome = match self.execute(reporter) {
            Ok(summary) => {
                tracing::info!(
                    version = %summary.version,
                    files = summary.files_copied,
                    up_to_date = summary.up_to_date,
                    "Asset sync finished"
                );
                SyncOutcome::Success(summary)
            }
            Err(e) => {
                tracing::error!(kind = %e.kind(), error = %e, "Asset sync failed");
                SyncOutcome::Failure(SyncFailure::from(&e))
            }
        };

        self.transition(SyncState::Done(outcome.clone()));
        outcome
    }

    fn transition(&mut self, next: SyncState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "Sync state transition");
        self.state = next;
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }

    fn execute(&mut self, reporter: &mut dyn ProgressReporter) -> Result<SyncSummary> {
        let root = self.config.bundle_root_path();
        BundleEnumerator::new(&*self.bundle).probe(&root)?;

        let oracle = VersionOracle::new(&*self.bundle, &self.config);
        let bundled = oracle.bundled_version();
        let installed = oracle.installed_version(&self.destination);
        if bundled == installed {
            tracing::info!(version = %bundled, "Installed assets are up to date");
            return Ok(SyncSummary {
                version: bundled,
                files_copied: 0,
                up_to_date: true,
            });
        }
        let total = oracle.bundled_file_count();
        tracing::info!(%bundled, %installed, "Installed assets are stale");

        self.check_cancelled()?;
        self.transition(SyncState::Syncing);
        reporter.started(total);
        reporter.report(0, CLEANUP_LABEL);

        let purged = asset_fs::purge(&self.destination)
            .map_err(|e| Error::destination(self.destination.to_native(), e))?;
        tracing::debug!(entries = purged.total(), "Purged previous installation");
        fs::create_dir_all(self.destination.to_native())
            .map_err(|e| Error::destination(self.destination.to_native(), e))?;

        let mut copier = TreeCopier::new(&*self.bundle, root.clone())
            .with_buffer_size(self.config.buffer_size)
            .with_policy(self.config.policy)
            .skipping(self.config.reserved_paths());
        if let Some(token) = &self.cancel {
            copier = copier.with_cancel_token(token.clone());
        }

        let mut progress = CopyProgress::new();
        let copied = copier.copy(&root, &self.destination, &mut progress, reporter)?;
        let stats = copier.stats();
        if stats.failed > 0 {
            tracing::warn!(
                failed = stats.failed,
                visited = stats.visited,
                "Some assets could not be copied"
            );
        }

        write_installed_version(
            &self.config,
            &self.destination,
            bundled,
            self.config.robustness.into(),
        )?;

        Ok(SyncSummary {
            version: bundled,
            files_copied: copied,
            up_to_date: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::MemoryBundle;
    use crate::progress::NoProgress;
    use tempfile::TempDir;

    fn orchestrator(bundle: MemoryBundle, temp: &TempDir) -> SyncOrchestrator {
        SyncOrchestrator::new(
            Box::new(bundle),
            NormalizedPath::new(temp.path()).join("share"),
            SyncConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn new_orchestrator_is_idle() {
        let temp = TempDir::new().unwrap();
        let orch = orchestrator(MemoryBundle::new(), &temp);
        assert_eq!(orch.state(), &SyncState::Idle);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SyncConfig {
            buffer_size: 0,
            ..SyncConfig::default()
        };
        let result = SyncOrchestrator::new(
            Box::new(MemoryBundle::new()),
            NormalizedPath::new("/tmp/x"),
            config,
        );
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn missing_root_fails_without_touching_destination() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("share")).unwrap();
        std::fs::write(temp.path().join("share/keep.txt"), "keep").unwrap();

        let outcome = orchestrator(MemoryBundle::new(), &temp).run(&mut NoProgress);

        let failure = outcome.failure().unwrap();
        assert_eq!(failure.kind, crate::ErrorKind::BundleUnreadable);
        assert!(temp.path().join("share/keep.txt").exists());
    }

    #[test]
    fn cancelled_before_purge_keeps_old_tree() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("share")).unwrap();
        std::fs::write(temp.path().join("share/old.txt"), "old").unwrap();
        let token = CancelToken::new();
        token.cancel();

        let bundle = MemoryBundle::new()
            .with_file("share/version.txt", "2")
            .with_file("share/a.txt", "a");
        let outcome = orchestrator(bundle, &temp)
            .with_cancel_token(token)
            .run(&mut NoProgress);

        assert_eq!(outcome.failure().unwrap().kind, crate::ErrorKind::Cancelled);
        assert!(temp.path().join("share/old.txt").exists());
    }
}
