//! Shared test utilities for the asset-sync workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`bundle`]: [`TestBundle`] builder for on-disk bundles
//! - [`dest`]: [`TestDest`] destination directory with assertions
//! - [`tree`]: [`assert_mirrors`] and tree listing helpers

pub mod bundle;
pub mod dest;
pub mod tree;

pub use bundle::TestBundle;
pub use dest::TestDest;
pub use tree::{assert_mirrors, relative_files};
