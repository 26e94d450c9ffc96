//! File comparison logic

use crate::types::SyncError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Decide whether `dest` already mirrors `src`.
///
/// Metadata-only comparison:
///
/// 1. **Missing destination**: `Ok(false)`, not an error
/// 2. **Size mismatch**: `Ok(false)`
/// 3. **Modification time**: must be exactly equal, no tolerance window
///
/// Any other stat failure on either side is returned as [`SyncError::Stat`].
///
/// # Example
/// ```no_run
/// use dirsync::diff::is_up_to_date;
/// use std::path::Path;
///
/// if !is_up_to_date(Path::new("src/a.txt"), Path::new("dst/a.txt"))? {
///     println!("a.txt needs a copy");
/// }
/// # Ok::<(), dirsync::SyncError>(())
/// ```
pub fn is_up_to_date(src: &Path, dest: &Path) -> Result<bool, SyncError> {
    let src_meta = fs::metadata(src).map_err(|source| SyncError::Stat {
        path: src.to_path_buf(),
        source,
    })?;

    let dest_meta = match fs::metadata(dest) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(source) => {
            return Err(SyncError::Stat {
                path: dest.to_path_buf(),
                source,
            })
        }
    };

    if src_meta.len() != dest_meta.len() {
        return Ok(false);
    }

    let src_mtime = src_meta.modified().map_err(|source| SyncError::Stat {
        path: src.to_path_buf(),
        source,
    })?;
    let dest_mtime = dest_meta.modified().map_err(|source| SyncError::Stat {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(src_mtime == dest_mtime)
}
