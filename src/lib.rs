//! Semantic version values tied to a `.semver` marker file.
//!
//! ```no_run
//! use semver_marker::version::Version;
//!
//! let file = semver_marker::locate(None)?;
//! let tag = file.version().to_string(); // e.g. "v1.4.2"
//!
//! let parsed = Version::parse("release-2.0", "release-%M.%m.%p", true)?;
//! assert_eq!(parsed.map(|v| v.minor()), Some(0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::{Path, PathBuf};

pub mod config;
pub mod marker;
pub mod version;

use crate::marker::fs::{FileSystem, OsFileSystem};
use crate::marker::{MarkerError, MarkerLocator, VersionFile};

/// Locate the marker file and load its version.
///
/// Searches from `start_dir`, or from the current working directory when `None`.
pub fn locate(start_dir: Option<&Path>) -> Result<VersionFile, MarkerError> {
    let path = locate_file_path(start_dir)?;
    VersionFile::load(path)
}

/// Locate the marker file without reading it.
///
/// Searches from `start_dir`, or from the current working directory when `None`.
pub fn locate_file_path(start_dir: Option<&Path>) -> Result<PathBuf, MarkerError> {
    let start_dir = match start_dir {
        Some(dir) => dir.to_path_buf(),
        None => OsFileSystem
            .current_dir()
            .map_err(|source| MarkerError::Io {
                path: PathBuf::from("."),
                source,
            })?,
    };
    MarkerLocator::default().find_file(&start_dir)
}
