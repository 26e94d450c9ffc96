//! Bounded job queue drained by a fixed set of workers.
//!
//! - one bounded `mpsc` channel; the walk is the only producer
//! - every worker pulls from the shared receiver behind an async mutex
//! - per-entry filesystem work runs on the runtime's blocking pool
//! - shutdown drops the sender, then awaits every worker

use crate::executor::worker::{JobContext, JobOutcome};
use crate::types::{SyncError, WalkEntry};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, Mutex};
use tokio::task::{self, JoinHandle};
use tracing::error;

use std::sync::Arc;
use std::time::Duration;

/// Counters for one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub workers: usize,
    pub enqueued: usize,
    pub directories: usize,
    pub skipped: usize,
    pub up_to_date: usize,
    pub copied: usize,
    pub failed: usize,
    pub bytes_copied: u64,
    pub per_worker_copied: Vec<usize>,
}

impl SyncStats {
    fn new(workers: usize) -> Self {
        Self {
            workers,
            per_worker_copied: vec![0; workers],
            ..Default::default()
        }
    }

    fn record(&mut self, worker_id: usize, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Directory => self.directories += 1,
            JobOutcome::Skipped => self.skipped += 1,
            JobOutcome::UpToDate => self.up_to_date += 1,
            JobOutcome::Copied { bytes } => {
                self.copied += 1;
                self.bytes_copied += bytes;
                if let Some(slot) = self.per_worker_copied.get_mut(worker_id - 1) {
                    *slot += 1;
                }
            }
            JobOutcome::Failed | JobOutcome::CopyFailed => self.failed += 1,
        }
    }
}

/// Worker pool consuming walk entries.
pub struct ParallelExecutor {
    runtime: Runtime,
    enqueue_tx: Option<mpsc::Sender<WalkEntry>>,
    worker_handles: Vec<JoinHandle<()>>,
    stats: Arc<Mutex<SyncStats>>,
}

impl ParallelExecutor {
    /// Start `worker_count` workers (at least one) behind a queue of `queue_capacity`.
    ///
    /// A worker whose copy fails sleeps for `failure_backoff` before pulling its
    /// next entry.
    pub fn new(
        worker_count: usize,
        queue_capacity: usize,
        failure_backoff: Duration,
        context: Arc<JobContext>,
    ) -> Result<Self, SyncError> {
        let workers = worker_count.max(1);
        let capacity = queue_capacity.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_all()
            .build()
            .map_err(SyncError::Io)?;

        let stats = Arc::new(Mutex::new(SyncStats::new(workers)));
        let handle = runtime.handle().clone();

        let (enqueue_tx, enqueue_rx) = mpsc::channel::<WalkEntry>(capacity);
        let jobs = Arc::new(Mutex::new(enqueue_rx));

        let worker_handles = (1..=workers)
            .map(|worker_id| {
                handle.spawn(worker_loop(
                    worker_id,
                    Arc::clone(&jobs),
                    Arc::clone(&context),
                    failure_backoff,
                    Arc::clone(&stats),
                ))
            })
            .collect();

        Ok(Self {
            runtime,
            enqueue_tx: Some(enqueue_tx),
            worker_handles,
            stats,
        })
    }

    /// Queue an entry, blocking while the queue is full.
    pub fn enqueue(&self, entry: WalkEntry) -> Result<(), SyncError> {
        let sender = self
            .enqueue_tx
            .as_ref()
            .ok_or_else(|| SyncError::Pool("job queue is already closed".to_string()))?;
        let stats = Arc::clone(&self.stats);

        self.runtime.block_on(async {
            sender
                .send(entry)
                .await
                .map_err(|_| SyncError::Pool("all workers have exited".to_string()))?;

            let mut guard = stats.lock().await;
            guard.enqueued += 1;
            Ok(())
        })
    }

    /// Close the queue and wait for every worker to drain it and exit.
    pub fn close_and_wait(mut self) -> Result<SyncStats, SyncError> {
        self.enqueue_tx.take();

        let workers = std::mem::take(&mut self.worker_handles);
        let stats = Arc::clone(&self.stats);

        self.runtime.block_on(async move {
            for handle in workers {
                handle.await.map_err(map_join_error)?;
            }
            Ok(stats.lock().await.clone())
        })
    }
}

async fn worker_loop(
    worker_id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<WalkEntry>>>,
    context: Arc<JobContext>,
    failure_backoff: Duration,
    stats: Arc<Mutex<SyncStats>>,
) {
    loop {
        let next = jobs.lock().await.recv().await;
        let Some(entry) = next else {
            break;
        };

        let ctx = Arc::clone(&context);
        let outcome = match task::spawn_blocking(move || ctx.process(worker_id, &entry)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(worker = worker_id, error = %e, "job panicked");
                JobOutcome::Failed
            }
        };

        stats.lock().await.record(worker_id, &outcome);

        if outcome == JobOutcome::CopyFailed {
            tokio::time::sleep(failure_backoff).await;
        }
    }
}

fn map_join_error(error: task::JoinError) -> SyncError {
    SyncError::Pool(format!("worker task failed: {}", error))
}
