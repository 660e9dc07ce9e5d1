use std::path::PathBuf;

use thiserror::Error;

use crate::version::error::VersionError;

#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{} is not semantic versioned", .0.display())]
    MarkerNotFound(PathBuf),

    #[error("Invalid semver file: {}", .0.display())]
    InvalidVersionFile(PathBuf),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed semver file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
