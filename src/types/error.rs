//! Error types for dirsync

use std::path::PathBuf;
use thiserror::Error;

/// Error types for dirsync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Traversal of the source tree failed
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Walked path does not live under the source root
    #[error("Cannot compute path of {path} relative to {root}")]
    RelativePath { path: PathBuf, root: PathBuf },

    /// Metadata lookup failed for a reason other than a missing destination
    #[error("Failed to stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opening, reading or writing during a transfer failed
    #[error("Failed to copy {src} to {dest}: {source}")]
    Copy {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Restoring the modification time on a copied file failed
    #[error("Failed to set times on {path}: {source}")]
    Times {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Appending a record to the activity log failed
    #[error("Failed to append to log {path}: {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Worker pool runtime failure
    #[error("Worker pool error: {0}")]
    Pool(String),
}

impl SyncError {
    /// Errors that end a sync run rather than a single entry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::Config(_) | SyncError::Walk(_) | SyncError::Pool(_)
        )
    }

    /// Check if this error is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_io_error_automatic_conversion() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let sync_error: SyncError = io_error.into();

        assert!(matches!(sync_error, SyncError::Io(_)));
        assert!(sync_error.to_string().contains("IO error"));
    }

    #[test]
    fn test_io_error_from_function() {
        fn returns_io_error() -> Result<(), SyncError> {
            let _file = std::fs::File::open("/nonexistent/path/file.txt")?;
            Ok(())
        }

        let result = returns_io_error();
        assert!(matches!(result, Err(SyncError::Io(_))));
    }

    #[test]
    fn test_config_error() {
        let error = SyncError::Config("worker must be at least 1".to_string());
        assert!(error.to_string().contains("Configuration error"));
        assert!(error.to_string().contains("worker must be at least 1"));
        assert!(error.is_config_error());
        assert!(error.is_fatal());
    }

    #[test]
    fn test_copy_error_names_both_paths() {
        let error = SyncError::Copy {
            src: PathBuf::from("/src/a.txt"),
            dest: PathBuf::from("/dst/a.txt"),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("/src/a.txt"));
        assert!(message.contains("/dst/a.txt"));
        assert!(message.contains("denied"));
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_source_chain_is_preserved() {
        use std::error::Error;

        let error = SyncError::Stat {
            path: PathBuf::from("x"),
            source: IoError::new(ErrorKind::Other, "boom"),
        };
        let source = error.source().expect("stat error should carry a source");
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn test_per_entry_errors_are_not_fatal() {
        let entry_errors = [
            SyncError::RelativePath {
                path: PathBuf::from("/elsewhere/a"),
                root: PathBuf::from("/src"),
            },
            SyncError::Times {
                path: PathBuf::from("a"),
                source: IoError::new(ErrorKind::Other, "t"),
            },
            SyncError::Log {
                path: PathBuf::from("sync.log"),
                source: IoError::new(ErrorKind::Other, "l"),
            },
        ];
        for error in &entry_errors {
            assert!(!error.is_fatal(), "{error} should not end the run");
        }
        assert!(SyncError::Pool("join".to_string()).is_fatal());
    }
}
