//! Core type definitions for dirsync

mod entry;
mod error;
mod outcome;
mod request;

pub use entry::WalkEntry;
pub use error::SyncError;
pub use outcome::{LogRecord, TransferOutcome};
pub use request::{
    dotted_extension, normalize_extension, SyncRequest, DEFAULT_FAILURE_BACKOFF,
    DEFAULT_QUEUE_CAPACITY,
};
