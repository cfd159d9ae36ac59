//! Producer side: recursive directory traversal.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Traversal options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Descend into symlinked directories. Symlinks to regular files are
    /// always scanned.
    pub follow_symlinks: bool,
}

/// Walk `root` and hand every regular file to `submit`, returning how many
/// files were submitted.
///
/// Entries below the root that cannot be read for permission reasons, and
/// symlinks that cannot be resolved (dangling, looping), are skipped without
/// being reported. Any other traversal error, or an error from `submit`,
/// ends the walk early; files submitted up to that point stay submitted.
pub(crate) fn walk<F>(root: &Path, options: WalkOptions, mut submit: F) -> Result<u64>
where
    F: FnMut(PathBuf) -> Result<()>,
{
    let metadata = fs::metadata(root).or_raise(|| ErrorKind::InvalidRoot(root.to_path_buf()))?;
    if !metadata.is_dir() {
        exn::bail!(ErrorKind::InvalidRoot(root.to_path_buf()));
    }

    let mut submitted = 0;
    for entry in WalkDir::new(root).follow_links(options.follow_symlinks).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => match skip_reason(&err) {
                Some(reason) => {
                    tracing::debug!(path = ?err.path(), reason, "Skipping entry");
                    continue;
                },
                None => {
                    let at = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    return Err(err).or_raise(|| ErrorKind::Traversal(at));
                },
            },
        };
        if !is_regular_file(&entry) {
            continue;
        }
        submit(entry.into_path())?;
        submitted += 1;
    }
    Ok(submitted)
}

/// Why a traversal error concerns a single entry rather than the walk.
/// Errors on the root itself are never skipped.
fn skip_reason(err: &walkdir::Error) -> Option<&'static str> {
    if err.depth() == 0 {
        return None;
    }
    if err.loop_ancestor().is_some() {
        return Some("symlink loop");
    }
    if err.io_error().is_some_and(|io| io.kind() == std::io::ErrorKind::PermissionDenied) {
        return Some("permission denied");
    }
    if err.path().is_some_and(is_symlink) {
        return Some("unresolvable symlink");
    }
    None
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_symlink())
}

fn is_regular_file(entry: &DirEntry) -> bool {
    // Without `follow_links`, the file type is the link's own; check the
    // target so links to files are still scanned.
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
