//! Temporary directory trees with marker files

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory tree; removed when dropped
pub struct TestTree {
    root: TempDir,
}

impl TestTree {
    /// Create a tree containing the given relative directories
    pub fn with_dirs(dirs: &[&str]) -> Self {
        let root = TempDir::new().unwrap();
        for dir in dirs {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    /// Canonical root path, so comparisons hold on systems where the temp dir is a symlink
    pub fn root(&self) -> PathBuf {
        self.root.path().canonicalize().unwrap()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }
}

/// Write a marker file into `dir` and return its path
pub fn write_marker(dir: &Path, major: u64, minor: u64, patch: u64, special: &str) -> PathBuf {
    let path = dir.join(".semver");
    std::fs::write(
        &path,
        format!("major: {major}\nminor: {minor}\npatch: {patch}\nspecial: '{special}'\n"),
    )
    .unwrap();
    path
}
