//! Upward search for the marker file

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::MARKER_FILE_NAME;
use crate::marker::error::MarkerError;
use crate::marker::fs::{FileSystem, OsFileSystem, normalize_path};
use crate::marker::record::VersionFile;

/// Finds the marker file by walking from a start directory towards the filesystem root
pub struct MarkerLocator<F: FileSystem = OsFileSystem> {
    fs: F,
}

impl Default for MarkerLocator {
    fn default() -> Self {
        Self::new(OsFileSystem)
    }
}

impl<F: FileSystem> MarkerLocator<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Returns the path of the nearest marker file at or above `start_dir`.
    ///
    /// Relative start directories are resolved against the current directory. The walk
    /// ends only at a filesystem root, regardless of depth.
    pub fn find_file(&self, start_dir: &Path) -> Result<PathBuf, MarkerError> {
        if !self.fs.is_dir(start_dir) {
            return Err(MarkerError::NotADirectory(start_dir.to_path_buf()));
        }

        let mut dir = if start_dir.is_absolute() {
            normalize_path(start_dir, Path::new("/"))
        } else {
            let cwd = self.fs.current_dir().map_err(|source| MarkerError::Io {
                path: start_dir.to_path_buf(),
                source,
            })?;
            normalize_path(start_dir, &cwd)
        };

        loop {
            let candidate = dir.join(MARKER_FILE_NAME);
            debug!("semver: looking at {:?}", candidate);

            if self.fs.exists(&candidate) {
                return Ok(candidate);
            }

            match dir.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => return Err(MarkerError::MarkerNotFound(start_dir.to_path_buf())),
            }
        }
    }

    /// Locate the marker file and load the version it holds
    pub fn find(&self, start_dir: &Path) -> Result<VersionFile, MarkerError> {
        let path = self.find_file(start_dir)?;
        VersionFile::load(path)
    }
}
