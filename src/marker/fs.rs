//! Filesystem access used by the marker locator

use std::io;
use std::path::{Component, Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// Trait for the filesystem queries the locator needs
#[cfg_attr(test, automock)]
pub trait FileSystem {
    /// Check if the path exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if anything exists at the path
    fn exists(&self, path: &Path) -> bool;

    /// Returns the process's current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;
}

/// [`FileSystem`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
}

/// Make a path absolute against `base` and resolve `.` and `..` lexically.
///
/// Symlinks are not followed; `..` at the root stays at the root.
pub fn normalize_path(path: &Path, base: &Path) -> PathBuf {
    let joined;
    let path = if path.is_absolute() {
        path
    } else {
        joined = base.join(path);
        &joined
    };

    let mut components = path.components().peekable();
    let mut normalized = if let Some(c @ Component::Prefix(..)) = components.peek().copied() {
        components.next();
        PathBuf::from(c.as_os_str())
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::Prefix(..) => {}
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(name) => normalized.push(name),
        }
    }
    normalized
}
