//! Filesystem edits performed by the engine.
//!
//! Replacing an existing file with a link never leaves a gap: the link
//! is staged as a sibling and swapped in with a rename, so the target
//! path always holds either the old file or the finished link.

use std::path::Path;

use tracing::{debug, warn};

use crate::consts::BACKUP_SUFFIX;
use crate::linkmode::LinkMode;
use crate::paths::AbsolutePath;

/// Replace whatever exists at `target` with a link to `dotfile`.
pub fn replace_with_link(
    target: &AbsolutePath,
    dotfile: &AbsolutePath,
    mode: LinkMode,
) -> std::io::Result<()> {
    let staged = target.with_suffix(BACKUP_SUFFIX);
    if std::fs::symlink_metadata(&staged).is_ok() {
        debug!("Removing leftover staging file {staged}");
        std::fs::remove_file(&staged)?;
    }
    mode.create_link(&staged, dotfile)?;
    if let Err(err) = std::fs::rename(&staged, target) {
        let _ = std::fs::remove_file(&staged);
        return Err(err);
    }
    Ok(())
}

/// Copy the target's current content into the dotfile, then link the
/// target back to it. Used when the user answers "adopt" at a conflict
/// prompt.
pub fn adopt_changes(
    target: &AbsolutePath,
    dotfile: &AbsolutePath,
    mode: LinkMode,
) -> std::io::Result<()> {
    let contents = std::fs::read(target)?;
    std::fs::write(dotfile, contents)?;
    replace_with_link(target, dotfile, mode)
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &AbsolutePath) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) => std::fs::create_dir_all(parent),
        None => Ok(()),
    }
}

/// Remove `path` and prune any directories the removal left empty,
/// stopping at (and never removing) `stop_at`. Returns false when the
/// file could not be removed.
#[must_use]
pub fn remove_and_cleanup(path: &AbsolutePath, stop_at: &AbsolutePath) -> bool {
    if let Err(err) = std::fs::remove_file(path) {
        warn!("Error removing {path}: {err}");
        return false;
    }
    cleanup_empty_dirs(path.as_path(), stop_at);
    true
}

fn cleanup_empty_dirs(removed: &Path, stop_at: &AbsolutePath) {
    let mut current = removed.parent();
    while let Some(dir) = current {
        if dir == stop_at.as_path() || !dir.starts_with(stop_at) {
            break;
        }
        let empty = std::fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_none());
        if !empty {
            break;
        }
        if let Err(err) = std::fs::remove_dir(dir) {
            debug!("Not pruning {}: {err}", dir.display());
            break;
        }
        debug!("Pruned empty directory {}", dir.display());
        current = dir.parent();
    }
}
