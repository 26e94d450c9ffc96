//! Append-only activity log of completed copies
//!
//! One `ActivityLog` is shared by every worker of a run. Each record is
//! appended with a single write while holding the log's mutex, so concurrent
//! records never interleave. Order across workers is unspecified.

use crate::types::{LogRecord, SyncError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Receives each formatted record (without trailing newline).
pub type EchoCallback = dyn Fn(&str) + Send + Sync;

enum Echo {
    Stdout,
    Silent,
    Callback(Box<EchoCallback>),
}

/// Serialized writer for the on-disk copy log.
pub struct ActivityLog {
    path: PathBuf,
    echo: Echo,
    lock: Mutex<()>,
}

impl ActivityLog {
    /// Log to `path` and echo every record to stdout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            echo: Echo::Stdout,
            lock: Mutex::new(()),
        }
    }

    /// Route the operator-visible copy of each record through `callback`.
    pub fn with_echo(mut self, callback: Box<EchoCallback>) -> Self {
        self.echo = Echo::Callback(callback);
        self
    }

    /// Write records to the file only.
    pub fn silent(mut self) -> Self {
        self.echo = Echo::Silent;
        self
    }

    /// Append one `"<RFC3339>: <destination>"` line for a completed copy.
    ///
    /// The log file is created on first use and never truncated.
    pub fn record(&self, destination: &Path) -> Result<LogRecord, SyncError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let record = LogRecord::now(destination.to_path_buf());
        let line = record.to_string();

        let log_err = |source: std::io::Error| SyncError::Log {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(log_err)?;
        file.write_all(format!("{line}\n").as_bytes())
            .map_err(log_err)?;

        match &self.echo {
            Echo::Stdout => println!("{line}"),
            Echo::Silent => {}
            Echo::Callback(callback) => callback(&line),
        }

        Ok(record)
    }
}

impl std::fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLog")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_record_creates_log_and_appends_line() {
        let dir = TempDir::new().expect("create tempdir");
        let log_path = dir.path().join("sync.log");
        let log = ActivityLog::new(&log_path).silent();

        let record = log.record(Path::new("/dst/a.txt")).expect("record");
        assert_eq!(record.destination, PathBuf::from("/dst/a.txt"));

        let content = fs::read_to_string(&log_path).expect("read log");
        assert_eq!(content, format!("{record}\n"));
        assert!(content.ends_with(": /dst/a.txt\n"));
    }

    #[test]
    fn test_record_preserves_existing_content() {
        let dir = TempDir::new().expect("create tempdir");
        let log_path = dir.path().join("sync.log");
        fs::write(&log_path, "previous run\n").expect("seed log");

        let log = ActivityLog::new(&log_path).silent();
        log.record(Path::new("/dst/b.txt")).expect("record");

        let content = fs::read_to_string(&log_path).expect("read log");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "previous run");
        assert!(lines[1].ends_with(": /dst/b.txt"));
    }

    #[test]
    fn test_echo_callback_receives_same_line() {
        let dir = TempDir::new().expect("create tempdir");
        let log_path = dir.path().join("sync.log");
        let echoed = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&echoed);
        let log = ActivityLog::new(&log_path).with_echo(Box::new(move |line: &str| {
            sink.lock().expect("lock echo").push(line.to_string());
        }));

        log.record(Path::new("/dst/c.txt")).expect("record");

        let content = fs::read_to_string(&log_path).expect("read log");
        let echoed = echoed.lock().expect("lock echo");
        assert_eq!(echoed.len(), 1);
        assert_eq!(format!("{}\n", echoed[0]), content);
    }

    #[test]
    fn test_concurrent_records_do_not_interleave() {
        let dir = TempDir::new().expect("create tempdir");
        let log_path = dir.path().join("sync.log");
        let log = Arc::new(ActivityLog::new(&log_path).silent());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for i in 0..25 {
                        let dest = PathBuf::from(format!("/dst/w{worker}/file-{i:03}.bin"));
                        log.record(&dest).expect("record");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("join writer");
        }

        let content = fs::read_to_string(&log_path).expect("read log");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 200);
        for line in lines {
            let (stamp, path) = line.split_once(": ").expect("well-formed line");
            chrono::DateTime::parse_from_rfc3339(stamp).expect("valid timestamp");
            assert!(path.starts_with("/dst/w") && path.ends_with(".bin"), "{line}");
        }
    }

    #[test]
    fn test_unwritable_log_path_is_reported() {
        let dir = TempDir::new().expect("create tempdir");
        let log = ActivityLog::new(dir.path().join("missing/dir/sync.log")).silent();

        let result = log.record(Path::new("/dst/a.txt"));
        assert!(matches!(result, Err(SyncError::Log { .. })));
    }
}
