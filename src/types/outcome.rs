//! Results produced by a transfer and by the activity log

use super::SyncError;
use chrono::{DateTime, Local, SecondsFormat};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Result of a successful file transfer.
#[derive(Debug)]
pub struct TransferOutcome {
    /// Bytes written to the destination
    pub bytes_copied: u64,

    /// Wall time spent streaming
    pub elapsed: Duration,

    /// Set when the copy succeeded but the modification time could not be restored
    pub mtime_error: Option<SyncError>,
}

impl TransferOutcome {
    /// Average throughput over the whole transfer in bytes per second.
    pub fn throughput_bps(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.bytes_copied as f64 / secs) as u64
        } else {
            0
        }
    }
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub destination: PathBuf,
}

impl LogRecord {
    /// Record a copy to `destination` at the current local time.
    pub fn now(destination: PathBuf) -> Self {
        Self {
            timestamp: Local::now(),
            destination,
        }
    }

    /// RFC 3339 timestamp with second precision.
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.timestamp_rfc3339(),
            self.destination.display()
        )
    }
}
