//! Per-entry pipeline run by every pool worker

use crate::diff::is_up_to_date;
use crate::executor::copy::{copy_file, TransferCallback};
use crate::executor::log::ActivityLog;
use crate::types::{SyncError, SyncRequest, WalkEntry};
use crate::ui::ProgressReporter;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// What happened to one queued entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Directory mirrored (or already present)
    Directory,
    /// Extension is skip-listed
    Skipped,
    /// Destination already matches
    UpToDate,
    /// File copied
    Copied { bytes: u64 },
    /// Entry could not be processed; no copy was attempted
    Failed,
    /// The copy itself failed; the worker backs off before its next job
    CopyFailed,
}

/// Read-only state shared by all workers of a run.
pub struct JobContext {
    request: Arc<SyncRequest>,
    log: Arc<ActivityLog>,
    reporter: Option<ProgressReporter>,
}

impl JobContext {
    pub fn new(
        request: Arc<SyncRequest>,
        log: Arc<ActivityLog>,
        reporter: Option<ProgressReporter>,
    ) -> Self {
        Self {
            request,
            log,
            reporter,
        }
    }

    pub fn request(&self) -> &SyncRequest {
        &self.request
    }

    /// Destination path mirroring `entry`, or `None` if it is outside the source root.
    pub fn mirror_path(&self, entry: &WalkEntry) -> Option<PathBuf> {
        entry
            .relative_to(&self.request.source_root)
            .map(|relative| self.request.dest_root.join(relative))
    }

    /// Create the mirrored directory for `entry` ahead of its children.
    ///
    /// Failures are left for the worker that later processes the entry to report.
    pub fn prepare_directory(&self, entry: &WalkEntry) {
        if !entry.is_dir || self.request.is_skip_listed(&entry.path) {
            return;
        }
        if let Some(dest) = self.mirror_path(entry) {
            if let Err(e) = create_mirror_dir(&dest) {
                debug!(path = %dest.display(), error = %e, "early directory creation failed");
            }
        }
    }

    /// Classify `entry` and copy it if the destination is missing or stale.
    pub fn process(&self, worker_id: usize, entry: &WalkEntry) -> JobOutcome {
        let Some(dest) = self.mirror_path(entry) else {
            let err = SyncError::RelativePath {
                path: entry.path.clone(),
                root: self.request.source_root.clone(),
            };
            warn!(worker = worker_id, path = %entry.path.display(), error = %err, "Error getting relative path");
            return JobOutcome::Failed;
        };

        if self.request.is_skip_listed(&entry.path) {
            return JobOutcome::Skipped;
        }

        if entry.is_dir {
            return match create_mirror_dir(&dest) {
                Ok(()) => JobOutcome::Directory,
                Err(e) => {
                    warn!(worker = worker_id, path = %dest.display(), error = %e, "Error creating directory");
                    JobOutcome::Failed
                }
            };
        }

        match is_up_to_date(&entry.path, &dest) {
            Ok(true) => return JobOutcome::UpToDate,
            Ok(false) => {}
            Err(e) => {
                warn!(
                    worker = worker_id,
                    src = %entry.path.display(),
                    dest = %dest.display(),
                    error = %e,
                    "Error comparing files"
                );
                return JobOutcome::Failed;
            }
        }

        debug!(
            worker = worker_id,
            src = %entry.path.display(),
            dest = %dest.display(),
            "Copying"
        );
        let transfer = match &self.reporter {
            Some(reporter) => {
                let bar = reporter.start_transfer(&entry.path, entry.size);
                let on_progress: &TransferCallback<'_> =
                    &|bytes: u64, bps: u64| bar.update(bytes, bps);
                copy_file(&entry.path, &dest, Some(on_progress))
            }
            None => copy_file(&entry.path, &dest, None),
        };

        let outcome = match transfer {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    worker = worker_id,
                    src = %entry.path.display(),
                    dest = %dest.display(),
                    error = %e,
                    "Error copying file"
                );
                return JobOutcome::CopyFailed;
            }
        };

        debug!(
            worker = worker_id,
            bytes = outcome.bytes_copied,
            bytes_per_sec = outcome.throughput_bps(),
            "Copied"
        );

        if let Some(e) = &outcome.mtime_error {
            warn!(worker = worker_id, path = %dest.display(), error = %e, "Error setting times");
        }

        if let Err(e) = self.log.record(&dest) {
            warn!(worker = worker_id, path = %dest.display(), error = %e, "Error logging file");
        }

        JobOutcome::Copied {
            bytes: outcome.bytes_copied,
        }
    }
}

/// `mkdir -p` with the platform's default (umask-filtered) permissions.
fn create_mirror_dir(path: &Path) -> Result<(), SyncError> {
    fs::create_dir_all(path).map_err(SyncError::Io)
}
