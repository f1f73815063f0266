//! Dotfiles repository scanner.
//!
//! Walks the repository and produces the relative paths of every file
//! that should be considered for installation, applying the exclusion
//! and inclusion rules. Directory entries are visited in name order so
//! repeated runs see the files in the same order.

use std::path::Path;

use tracing::warn;

use crate::config::Config;
use crate::consts::{CRYPT_MARKER, IGNORE_HIDDEN_GLOB};
use crate::glob::GlobCollection;
use crate::paths::{AbsolutePath, RelativePath};

/// Decides which scanned files survive the exclusion rules.
pub struct FileFilter {
    ignore_hidden: bool,
    ignore_crypt: bool,
    explore_excluded: bool,
    exclude: GlobCollection,
    include: GlobCollection,
}

impl FileFilter {
    /// Build the filter from the configuration. The common `**/.*`
    /// exclusion is special-cased into a name check so hidden files are
    /// skipped without a glob match per entry. Encrypted files are
    /// skipped when the repository's encryption is locked.
    #[must_use]
    pub fn from_config(config: &Config, crypt_unlocked: bool) -> Self {
        let mut ignore_hidden = false;
        let patterns: Vec<&String> = config
            .exclude_files
            .iter()
            .filter(|p| {
                if p.as_str() == IGNORE_HIDDEN_GLOB {
                    ignore_hidden = true;
                    false
                } else {
                    true
                }
            })
            .collect();
        Self {
            ignore_hidden,
            ignore_crypt: !crypt_unlocked,
            explore_excluded: config.explore_excluded_dirs,
            exclude: GlobCollection::new(&patterns),
            include: GlobCollection::new(&config.include_files),
        }
    }

    fn matches_exclude(&self, path: &RelativePath, name: &str) -> bool {
        if self.ignore_hidden && name.starts_with('.') {
            return true;
        }
        if self.ignore_crypt && name.contains(CRYPT_MARKER) {
            return true;
        }
        self.exclude.matches(path)
    }

    /// Whether `path` is excluded, taking an already-excluded parent
    /// directory and the `include_files` overrides into account.
    fn is_excluded(&self, path: &RelativePath, name: &str, in_excluded_dir: bool) -> bool {
        (in_excluded_dir || self.matches_exclude(path, name)) && !self.include.matches(path)
    }

    /// Whether the scanner needs to descend into an excluded directory
    /// at all.
    fn descend_into_excluded(&self) -> bool {
        self.explore_excluded && !self.include.is_empty()
    }
}

/// All installable files under `root`, as root-relative paths.
#[must_use]
pub fn scan_directory(root: &AbsolutePath, filter: &FileFilter) -> Vec<RelativePath> {
    let mut files = Vec::new();
    walk(root.as_path(), "", filter, false, &mut files);
    files
}

fn walk(
    dir: &Path,
    prefix: &str,
    filter: &FileFilter,
    in_excluded_dir: bool,
    files: &mut Vec<RelativePath>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Error reading directory {}: {err}", dir.display());
            return;
        }
    };
    let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = RelativePath::new(format!("{prefix}{name}"));
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

        if is_dir {
            // The include override applies to directories too: an
            // included directory inside an excluded subtree descends
            // with the exclusion cleared.
            let excluded = filter.is_excluded(&rel, &name, in_excluded_dir);
            if excluded && !filter.descend_into_excluded() {
                continue;
            }
            walk(
                &entry.path(),
                &format!("{rel}/"),
                filter,
                excluded,
                files,
            );
        } else if !filter.is_excluded(&rel, &name, in_excluded_dir) {
            files.push(rel);
        }
    }
}
