//! Link strategy: symlinks or hardlinks.
//!
//! The mode decides how a link is created, how an installed link is
//! recognised, when an unrecorded link may be deleted, and how links
//! are rediscovered from the filesystem when the cache is distrusted.

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::cache::LinkEntry;
use crate::error::LinkModeError;
use crate::paths::AbsolutePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Symlink,
    Hardlink,
}

impl LinkMode {
    /// Select the mode from the `use_hardlinks` setting. Hardlink
    /// identity relies on inode numbers, so hardlink mode is only
    /// offered on unix.
    pub fn from_config(use_hardlinks: bool) -> Result<Self, LinkModeError> {
        if !use_hardlinks {
            return Ok(Self::Symlink);
        }
        if cfg!(unix) {
            Ok(Self::Hardlink)
        } else {
            Err(LinkModeError::HardlinksUnsupported)
        }
    }

    /// Create a link at `target` pointing at (or sharing the inode of)
    /// `dotfile`.
    pub fn create_link(
        self,
        target: &AbsolutePath,
        dotfile: &AbsolutePath,
    ) -> std::io::Result<()> {
        match self {
            Self::Symlink => symlink(dotfile, target),
            Self::Hardlink => std::fs::hard_link(dotfile, target),
        }
    }

    /// True if `target` is already the installed link for `dotfile`.
    #[must_use]
    pub fn is_installed_link_of(self, target: &AbsolutePath, dotfile: &AbsolutePath) -> bool {
        match self {
            Self::Symlink => std::fs::read_link(target)
                .is_ok_and(|dest| dest == dotfile.as_path()),
            Self::Hardlink => same_inode(target, dotfile),
        }
    }

    /// Whether a link recorded in the cache may be deleted even though
    /// its exact destination no longer matches. Symlinks must still
    /// point somewhere inside the dotfiles root; hardlinks must not be
    /// the last reference to their data.
    #[must_use]
    pub fn can_be_safely_removed(self, path: &AbsolutePath, source_root: &AbsolutePath) -> bool {
        match self {
            Self::Symlink => {
                std::fs::read_link(path).is_ok_and(|dest| {
                    AbsolutePath::new(dest).is_ok_and(|d| d.starts_with(source_root))
                })
            }
            Self::Hardlink => has_other_references(path),
        }
    }

    /// Rediscover installed links by walking the filesystem, for runs
    /// where the cache cannot be trusted (`--full-clean`).
    #[must_use]
    pub fn recalculate_links(
        self,
        source_root: &AbsolutePath,
        target_root: &AbsolutePath,
    ) -> Vec<LinkEntry> {
        match self {
            Self::Symlink => recalculate_symlinks(source_root, target_root),
            Self::Hardlink => recalculate_hardlinks(source_root, target_root),
        }
    }
}

#[cfg(unix)]
fn symlink(dotfile: &AbsolutePath, target: &AbsolutePath) -> std::io::Result<()> {
    std::os::unix::fs::symlink(dotfile, target)
}

#[cfg(windows)]
fn symlink(dotfile: &AbsolutePath, target: &AbsolutePath) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(dotfile, target)
}

#[cfg(unix)]
fn same_inode(a: &AbsolutePath, b: &AbsolutePath) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (
        std::fs::symlink_metadata(a),
        std::fs::symlink_metadata(b),
    ) {
        (Ok(ma), Ok(mb)) => {
            ma.is_file() && mb.is_file() && ma.dev() == mb.dev() && ma.ino() == mb.ino()
        }
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_inode(_a: &AbsolutePath, _b: &AbsolutePath) -> bool {
    false
}

#[cfg(unix)]
fn has_other_references(path: &AbsolutePath) -> bool {
    use std::os::unix::fs::MetadataExt;
    std::fs::symlink_metadata(path).is_ok_and(|m| m.is_file() && m.nlink() > 1)
}

#[cfg(not(unix))]
fn has_other_references(_path: &AbsolutePath) -> bool {
    false
}

/// Every symlink under `target_root` whose destination lies inside
/// `source_root`.
fn recalculate_symlinks(
    source_root: &AbsolutePath,
    target_root: &AbsolutePath,
) -> Vec<LinkEntry> {
    let mut links = Vec::new();
    for entry in WalkDir::new(target_root).into_iter().filter_map(|e| {
        e.map_err(|err| debug!("Skipping unreadable entry: {err}")).ok()
    }) {
        if !entry.path_is_symlink() {
            continue;
        }
        let Ok(dest) = std::fs::read_link(entry.path()) else {
            continue;
        };
        let Ok(dest) = AbsolutePath::new(dest) else {
            continue;
        };
        if !dest.starts_with(source_root) {
            continue;
        }
        match AbsolutePath::new(entry.path()) {
            Ok(path) => links.push(LinkEntry::new(&path, &dest)),
            Err(err) => warn!("Skipping {}: {err}", entry.path().display()),
        }
    }
    links
}

/// Every regular file under `target_root` sharing an inode with a
/// multiply-linked file under `source_root`.
#[cfg(unix)]
fn recalculate_hardlinks(
    source_root: &AbsolutePath,
    target_root: &AbsolutePath,
) -> Vec<LinkEntry> {
    use std::collections::HashMap;
    use std::os::unix::fs::MetadataExt;

    let mut sources: HashMap<(u64, u64), AbsolutePath> = HashMap::new();
    for entry in WalkDir::new(source_root)
        .into_iter()
        .filter_map(Result::ok)
    {
        let Ok(meta) = entry.metadata() else { continue };
        if !meta.is_file() || meta.nlink() < 2 {
            continue;
        }
        if let Ok(path) = AbsolutePath::new(entry.path()) {
            sources.insert((meta.dev(), meta.ino()), path);
        }
    }
    if sources.is_empty() {
        return Vec::new();
    }

    let mut links = Vec::new();
    for entry in WalkDir::new(target_root)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.path().starts_with(source_root) {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        if !meta.is_file() {
            continue;
        }
        if let Some(source) = sources.get(&(meta.dev(), meta.ino()))
            && let Ok(path) = AbsolutePath::new(entry.path())
        {
            links.push(LinkEntry::new(&path, source));
        }
    }
    links
}

#[cfg(not(unix))]
fn recalculate_hardlinks(
    _source_root: &AbsolutePath,
    _target_root: &AbsolutePath,
) -> Vec<LinkEntry> {
    Vec::new()
}
