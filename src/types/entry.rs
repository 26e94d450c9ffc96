//! WalkEntry - one entry discovered by the tree walk

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source tree entry handed from the walk to exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path as produced by the walk (rooted at the source root)
    pub path: PathBuf,

    /// Whether the entry is (or links to) a directory
    pub is_dir: bool,

    /// Size in bytes
    pub size: u64,

    /// Modification time
    pub mtime: SystemTime,
}

impl WalkEntry {
    /// Create a new entry
    pub fn new(path: PathBuf, is_dir: bool, size: u64, mtime: SystemTime) -> Self {
        Self {
            path,
            is_dir,
            size,
            mtime,
        }
    }

    /// Build an entry from filesystem metadata.
    ///
    /// Platforms without modification times report the Unix epoch.
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        Self {
            path,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            mtime: metadata.modified().unwrap_or(UNIX_EPOCH),
        }
    }

    /// Path of this entry relative to `root`, or `None` if it is not under it.
    pub fn relative_to(&self, root: &Path) -> Option<&Path> {
        self.path.strip_prefix(root).ok()
    }
}
