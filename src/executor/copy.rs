//! Streaming file copy with mtime restore

use crate::types::{SyncError, TransferOutcome};
use filetime::FileTime;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::time::Instant;

/// Size of the intermediate copy buffer.
pub const COPY_BUFFER_SIZE: usize = 32 * 1024;

/// Callback for reporting transfer progress
///
/// Arguments:
/// - `bytes_so_far`: Bytes written to the destination so far
/// - `bytes_per_sec`: Average throughput since the transfer started
pub type TransferCallback<'a> = dyn Fn(u64, u64) + Send + Sync + 'a;

/// Copy `src` to `dest`, overwriting `dest` in place.
///
/// 1. Capture source metadata (mtime) before any bytes move
/// 2. Stream through a 32 KiB buffer, truncating any existing destination
/// 3. Flush the destination
/// 4. Set the destination mtime to the captured source mtime
///
/// The destination's parent directory must already exist. A failure while
/// streaming leaves the partially written destination in place. Failing to
/// restore the mtime does not fail the copy; it is returned in
/// [`TransferOutcome::mtime_error`].
///
/// # Example
/// ```no_run
/// use dirsync::executor::copy_file;
/// use std::path::Path;
///
/// let outcome = copy_file(Path::new("src/a.txt"), Path::new("dst/a.txt"), None)?;
/// println!("copied {} bytes", outcome.bytes_copied);
/// # Ok::<(), dirsync::SyncError>(())
/// ```
pub fn copy_file(
    src: &Path,
    dest: &Path,
    on_progress: Option<&TransferCallback<'_>>,
) -> Result<TransferOutcome, SyncError> {
    let copy_err = |source: std::io::Error| SyncError::Copy {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        source,
    };

    let mut src_file = File::open(src).map_err(copy_err)?;
    let src_mtime = src_file
        .metadata()
        .map(|meta| FileTime::from_last_modification_time(&meta))
        .map_err(copy_err)?;
    let mut dest_file = File::create(dest).map_err(copy_err)?;

    let started = Instant::now();
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match src_file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(copy_err(e)),
        };

        dest_file
            .write_all(&buffer[..bytes_read])
            .map_err(copy_err)?;
        total_bytes += bytes_read as u64;

        if let Some(callback) = on_progress {
            callback(total_bytes, average_bps(total_bytes, started));
        }
    }

    dest_file.flush().map_err(copy_err)?;
    drop(dest_file);
    drop(src_file);

    let elapsed = started.elapsed();
    let mtime_error = filetime::set_file_times(dest, FileTime::now(), src_mtime)
        .err()
        .map(|source| SyncError::Times {
            path: dest.to_path_buf(),
            source,
        });

    Ok(TransferOutcome {
        bytes_copied: total_bytes,
        elapsed,
        mtime_error,
    })
}

fn average_bps(bytes: u64, started: Instant) -> u64 {
    let secs = started.elapsed().as_secs_f64();
    if secs > 0.0 {
        (bytes as f64 / secs) as u64
    } else {
        0
    }
}
