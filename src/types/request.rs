//! SyncRequest - the immutable description of one sync run

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pending paths the walk may queue ahead of the workers.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Pause a worker takes after a failed copy before pulling its next job.
pub const DEFAULT_FAILURE_BACKOFF: Duration = Duration::from_secs(30);

/// Everything a run needs, resolved before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub log_path: PathBuf,
    pub worker_count: usize,
    /// Lowercase extensions, each with its leading `.`
    pub skip_extensions: BTreeSet<String>,
    pub queue_capacity: usize,
    pub failure_backoff: Duration,
}

impl SyncRequest {
    /// Create a request with one worker, no skip list and default tuning.
    pub fn new(
        source_root: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        log_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            log_path: log_path.into(),
            worker_count: 1,
            skip_extensions: BTreeSet::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            failure_backoff: DEFAULT_FAILURE_BACKOFF,
        }
    }

    /// Set the worker count (clamped to at least one).
    pub fn workers(mut self, count: usize) -> Self {
        self.worker_count = count.max(1);
        self
    }

    /// Replace the skip list. Entries are normalized with [`normalize_extension`].
    pub fn skip_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skip_extensions = extensions
            .into_iter()
            .filter_map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        self
    }

    /// Set the job queue capacity (clamped to at least one).
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Set the pause after a failed copy.
    pub fn failure_backoff(mut self, backoff: Duration) -> Self {
        self.failure_backoff = backoff;
        self
    }

    /// True if the final component's extension is skip-listed (case-insensitive).
    pub fn is_skip_listed(&self, path: &Path) -> bool {
        match dotted_extension(path) {
            Some(ext) => self.skip_extensions.contains(&ext),
            None => false,
        }
    }
}

/// Lowercase extension of the final path component, including the leading dot.
///
/// The extension starts at the last `.` of the file name, so `.bashrc` yields
/// `.bashrc` and `archive.tar.gz` yields `.gz`.
pub fn dotted_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let dot = name.rfind('.')?;
    Some(name[dot..].to_lowercase())
}

/// Lowercase a configured extension and make sure it starts with `.`.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{lower}"))
    }
}
