//! Marker file layer
//!
//! A directory tree is versioned by a `.semver` file placed at its root. This module
//! finds that file by walking upward from a start directory and reads or writes the
//! version it holds.
//!
//! # Modules
//!
//! - [`locator`]: Upward directory search for the marker file
//! - [`record`]: YAML persistence of a version bound to its file path
//! - [`fs`]: Filesystem trait the locator queries, and path normalization
//! - [`error`]: Error types for lookup and persistence

pub mod error;
pub mod fs;
pub mod locator;
pub mod record;

pub use error::MarkerError;
pub use locator::MarkerLocator;
pub use record::VersionFile;
