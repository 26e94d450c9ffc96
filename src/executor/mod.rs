//! Sync engine: tree walk feeding a pool of copy workers

pub mod copy;
pub mod log;
pub mod pool;
pub mod worker;

pub use copy::{copy_file, TransferCallback, COPY_BUFFER_SIZE};
pub use log::{ActivityLog, EchoCallback};
pub use pool::{ParallelExecutor, SyncStats};
pub use worker::{JobContext, JobOutcome};

use crate::scanner::walk_tree;
use crate::types::{SyncError, SyncRequest};
use crate::ui::ProgressReporter;
use std::sync::Arc;
use tracing::{debug, info};

/// Runs one mirror sync from a resolved [`SyncRequest`].
///
/// The activity log is injected here and only ever reached through
/// [`ActivityLog::record`].
pub struct SyncOrchestrator {
    request: Arc<SyncRequest>,
    log: Arc<ActivityLog>,
    reporter: Option<ProgressReporter>,
}

impl SyncOrchestrator {
    pub fn new(request: SyncRequest, log: ActivityLog) -> Self {
        Self {
            request: Arc::new(request),
            log: Arc::new(log),
            reporter: None,
        }
    }

    /// Show a progress bar for every in-flight transfer.
    pub fn with_progress(mut self, reporter: ProgressReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Walk the source tree, dispatch every entry to the workers and wait for them.
    ///
    /// The first traversal error ends the walk and is returned once the
    /// already queued entries have drained. Per-entry failures are only
    /// reported; they never turn into an `Err` here.
    ///
    /// # Panics
    ///
    /// Panics when called from within a tokio runtime, since the pool drives
    /// its own runtime with `block_on`.
    pub fn run(self) -> Result<SyncStats, SyncError> {
        let request = Arc::clone(&self.request);
        let context = Arc::new(JobContext::new(
            Arc::clone(&request),
            self.log,
            self.reporter,
        ));

        info!(
            source = %request.source_root.display(),
            destination = %request.dest_root.display(),
            workers = request.worker_count,
            "Starting sync"
        );

        let pool = ParallelExecutor::new(
            request.worker_count,
            request.queue_capacity,
            request.failure_backoff,
            Arc::clone(&context),
        )?;

        let walked = walk_tree(&request.source_root, |entry| {
            context.prepare_directory(&entry);
            pool.enqueue(entry)
        });

        let drained = pool.close_and_wait();
        if let Err(e) = walked {
            if let Ok(stats) = &drained {
                debug!(copied = stats.copied, failed = stats.failed, "drained after walk error");
            }
            return Err(e);
        }

        let stats = drained?;
        info!(
            copied = stats.copied,
            failed = stats.failed,
            per_worker = ?stats.per_worker_copied,
            "Sync finished"
        );
        Ok(stats)
    }
}

/// Run a sync with a log at `request.log_path` echoing to stdout.
///
/// # Panics
///
/// Panics when called from within a tokio runtime; see [`SyncOrchestrator::run`].
///
/// # Example
/// ```no_run
/// use dirsync::{sync, SyncRequest};
///
/// let request = SyncRequest::new("/data/src", "/mnt/backup", "/var/log/dirsync.log")
///     .workers(4)
///     .skip_extensions([".pdf"]);
/// let stats = sync(request)?;
/// println!("{} copied", stats.copied);
/// # Ok::<(), dirsync::SyncError>(())
/// ```
pub fn sync(request: SyncRequest) -> Result<SyncStats, SyncError> {
    let log = ActivityLog::new(request.log_path.clone());
    SyncOrchestrator::new(request, log).run()
}
