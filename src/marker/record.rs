//! Marker file persistence
//!
//! The marker is a small YAML mapping:
//!
//! ```yaml
//! major: 1
//! minor: 4
//! patch: 2
//! special: ''
//! ```
//!
//! Files written by older tooling spell the keys as Ruby symbols (`:major:`), which are
//! accepted on load. Saving always writes the plain spelling.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::marker::error::MarkerError;
use crate::version::semver::Version;

/// Raw record as read from disk; every field must be present for a valid file
#[derive(Debug, Default, Deserialize)]
struct VersionRecord {
    #[serde(alias = ":major")]
    major: Option<i64>,
    #[serde(alias = ":minor")]
    minor: Option<i64>,
    #[serde(alias = ":patch")]
    patch: Option<i64>,
    #[serde(alias = ":special")]
    special: Option<String>,
}

/// A version bound to the marker file it was loaded from (or will be saved to)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFile {
    path: PathBuf,
    version: Version,
}

impl VersionFile {
    /// Bind a version to a path without touching the filesystem
    pub fn create(path: impl Into<PathBuf>, version: Version) -> Self {
        Self {
            path: path.into(),
            version,
        }
    }

    /// Read a marker file.
    ///
    /// An empty file is treated as an empty mapping. All four keys must be present;
    /// explicit zeros and an empty special string are valid values.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MarkerError> {
        let path = path.into();
        debug!("Loading semver file {:?}", path);

        let content = std::fs::read_to_string(&path).map_err(|source| MarkerError::Io {
            path: path.clone(),
            source,
        })?;

        let record = if content.trim().is_empty() {
            VersionRecord::default()
        } else {
            serde_yaml::from_str::<Option<VersionRecord>>(&content)
                .map_err(|source| MarkerError::Yaml {
                    path: path.clone(),
                    source,
                })?
                .unwrap_or_default()
        };

        let VersionRecord {
            major: Some(major),
            minor: Some(minor),
            patch: Some(patch),
            special: Some(special),
        } = record
        else {
            return Err(MarkerError::InvalidVersionFile(path));
        };

        let version = Version::from_signed(major, minor, patch, special)?;
        Ok(Self { path, version })
    }

    /// Write the version back to the path it was loaded from
    pub fn save(&self) -> Result<(), MarkerError> {
        self.save_to(&self.path)
    }

    /// Write the version to another path, overwriting its content.
    /// The remembered path is left unchanged.
    pub fn save_to(&self, path: &Path) -> Result<(), MarkerError> {
        let yaml = serde_yaml::to_string(&self.version).map_err(|source| MarkerError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        std::fs::write(path, yaml).map_err(|source| MarkerError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Saved {} to {:?}", self.version, path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn version_mut(&mut self) -> &mut Version {
        &mut self.version
    }

    pub fn into_version(self) -> Version {
        self.version
    }
}
