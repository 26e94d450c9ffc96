//! # dirsync - One-way directory mirroring
//!
//! Walks a source tree and copies every missing or stale file into a
//! destination tree using a bounded pool of workers. Files whose extension is
//! skip-listed are never copied, and every completed copy is appended to a log.
//! Nothing is ever deleted from the destination.

// Module declarations
pub mod config;
pub mod scanner;
pub mod diff;
pub mod executor;
pub mod ui;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use types::{LogRecord, SyncError, SyncRequest, TransferOutcome, WalkEntry};
pub use executor::{sync, ActivityLog, SyncOrchestrator, SyncStats};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
