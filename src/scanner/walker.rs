//! Single-pass source tree walker

use crate::types::{SyncError, WalkEntry};
use std::fs;
use std::path::Path;

/// Walk `root_path` once, handing every entry (the root included) to `on_entry`.
///
/// Unlike a filtered scan, nothing is hidden: dotfiles are visited and ignore
/// files such as `.gitignore` are not honoured. Symlinks are not followed
/// during traversal, but an entry for a symlink carries the metadata of its
/// target when that target exists. Entries are visited in lexical order.
///
/// # Errors
/// The first traversal error (missing root, unreadable directory, failed
/// metadata lookup) stops the walk and is returned as [`SyncError::Walk`].
/// An error returned by `on_entry` also stops the walk and is returned as is.
pub fn walk_tree<F>(root_path: &Path, mut on_entry: F) -> Result<(), SyncError>
where
    F: FnMut(WalkEntry) -> Result<(), SyncError>,
{
    let walker = ignore::WalkBuilder::new(root_path)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for result in walker {
        let entry = result?;

        let metadata = if entry.path_is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(target) => target,
                // Dangling link: keep the link's own metadata, workers report it.
                Err(_) => entry.metadata()?,
            }
        } else {
            entry.metadata()?
        };

        on_entry(WalkEntry::from_metadata(entry.into_path(), &metadata))?;
    }

    Ok(())
}
