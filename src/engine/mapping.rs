//! The desired state: which target path links to which dotfile.
//!
//! A [`FileMapping`] is built from the scanner's output, then drives
//! the two reconciliation passes: removing links the repository no
//! longer produces and installing links it now wants. Conflicts with
//! files the user already has are resolved interactively.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::cache::LinkEntry;
use crate::config::Config;
use crate::consts::CRYPT_MARKER;
use crate::engine::hostname::HostnameFilter;
use crate::exec;
use crate::fsops;
use crate::linkmode::LinkMode;
use crate::paths::{AbsolutePath, RelativePath};
use crate::prompt::InputProvider;

/// The dotfile a target path should link to.
#[derive(Debug, Clone)]
struct MappedSource {
    path: AbsolutePath,
    host_specific: bool,
}

/// Desired target → dotfile mapping for one run.
pub struct FileMapping<'a> {
    mapping: HashMap<AbsolutePath, MappedSource>,
    source_base: AbsolutePath,
    target_base: AbsolutePath,
    diff_command: String,
    link_mode: LinkMode,
    input: &'a dyn InputProvider,
    /// Targets the user declined or that failed to install; excluded
    /// from the cache so the next run retries them.
    targets_skipped: HashSet<AbsolutePath>,
}

impl<'a> FileMapping<'a> {
    /// Build the mapping from the scanned repository files.
    #[must_use]
    pub fn new(
        source_base: AbsolutePath,
        config: &Config,
        hostname_filter: &HostnameFilter,
        link_mode: LinkMode,
        input: &'a dyn InputProvider,
        files: &[RelativePath],
    ) -> Self {
        let implicit_dot_ignore: HashSet<&str> = config
            .implicit_dot_ignore
            .iter()
            .map(String::as_str)
            .collect();
        let mut mapping = Self {
            mapping: HashMap::with_capacity(files.len()),
            source_base,
            target_base: config.target_dir.clone(),
            diff_command: config.diff_command.clone(),
            link_mode,
            input,
            targets_skipped: HashSet::new(),
        };
        for file in files {
            if let Some((target_rel, host_specific)) = map_source_to_target(
                file,
                hostname_filter,
                config.implicit_dot,
                &implicit_dot_ignore,
            ) {
                mapping.add(file, &target_rel, host_specific);
            }
        }
        mapping
    }

    fn add(&mut self, source_rel: &RelativePath, target_rel: &RelativePath, host_specific: bool) {
        let target = self.target_base.join_relative(target_rel);
        let source = MappedSource {
            path: self.source_base.join_relative(source_rel),
            host_specific,
        };
        match self.mapping.get(&target) {
            Some(existing) if existing.host_specific == host_specific => {
                warn!(
                    "Multiple files map to {target}: keeping {}, ignoring {}",
                    existing.path, source.path
                );
            }
            Some(existing) if existing.host_specific => {
                debug!(
                    "Host-specific {} overrides {} for {target}",
                    existing.path, source.path
                );
            }
            Some(existing) => {
                debug!(
                    "Host-specific {} overrides {} for {target}",
                    source.path, existing.path
                );
                self.mapping.insert(target, source);
            }
            None => {
                self.mapping.insert(target, source);
            }
        }
    }

    /// Number of desired links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// The dotfile a target maps to, for inspection in tests and `ls`.
    #[must_use]
    pub fn source_for(&self, target: &AbsolutePath) -> Option<&AbsolutePath> {
        self.mapping.get(target).map(|s| &s.path)
    }

    /// Remove cached links whose target no longer appears in the
    /// mapping. Returns the paths actually deleted. Runs before
    /// installation so a renamed dotfile frees its old target first.
    pub fn remove_stale_links(&self, cached: &[LinkEntry]) -> Vec<AbsolutePath> {
        let mut stale: Vec<&LinkEntry> = cached
            .iter()
            .filter(|link| {
                AbsolutePath::new(link.path.as_str())
                    .is_ok_and(|target| !self.mapping.contains_key(&target))
            })
            .collect();
        stale.sort();

        let mut removed = Vec::new();
        for link in stale {
            let Ok(target) = AbsolutePath::new(link.path.as_str()) else {
                continue;
            };
            if std::fs::symlink_metadata(&target).is_err() {
                debug!("Cached link {target} is already gone");
                continue;
            }
            let recorded = AbsolutePath::new(link.content.as_str()).ok();
            let still_ours = recorded
                .as_ref()
                .is_some_and(|content| self.link_mode.is_installed_link_of(&target, content))
                || self
                    .link_mode
                    .can_be_safely_removed(&target, &self.source_base);
            if !still_ours {
                warn!("Not removing {target}: it appears to have been modified externally");
                continue;
            }
            if fsops::remove_and_cleanup(&target, &self.target_base) {
                removed.push(target);
            }
        }
        removed
    }

    /// Install every link in the mapping that is not already in place.
    /// Returns the targets that were created or replaced.
    pub fn install_new_links(&mut self) -> Vec<AbsolutePath> {
        let mut desired: Vec<(AbsolutePath, AbsolutePath)> = self
            .mapping
            .iter()
            .map(|(target, source)| (target.clone(), source.path.clone()))
            .collect();
        desired.sort();

        let mut added = Vec::new();
        for (target, source) in desired {
            if self.link_mode.is_installed_link_of(&target, &source) {
                continue;
            }
            let installed = if std::fs::symlink_metadata(&target).is_ok() {
                self.replace_existing(&target, &source)
            } else {
                self.create_fresh(&target, &source)
            };
            if installed {
                added.push(target);
            } else {
                self.targets_skipped.insert(target);
            }
        }
        added
    }

    fn create_fresh(&self, target: &AbsolutePath, source: &AbsolutePath) -> bool {
        if let Err(err) = fsops::ensure_parent_dir(target) {
            warn!("Error creating parent directory for {target}: {err}");
            return false;
        }
        if let Err(err) = self.link_mode.create_link(target, source) {
            warn!("Error linking {target}: {err}");
            return false;
        }
        true
    }

    /// Something already exists at the target. Decide, asking the user
    /// where needed, whether to replace it.
    fn replace_existing(&self, target: &AbsolutePath, source: &AbsolutePath) -> bool {
        if let Ok(dest) = std::fs::read_link(target) {
            // A symlink we did not record. One pointing into the
            // repository is a leftover from an earlier layout; one that
            // matches the dotfile's own destination is equivalent.
            let ours = AbsolutePath::new(dest.clone())
                .is_ok_and(|d| d.starts_with(&self.source_base));
            let equivalent = std::fs::read_link(source).is_ok_and(|sd| sd == dest);
            if ours || equivalent {
                return self.replace(target, source);
            }
            let answer = self.input.request(
                "y/N",
                &format!("{target} is a symlink to {}, replace it?", dest.display()),
            );
            if answer == 'y' {
                return self.replace(target, source);
            }
            info!("Skipping {target}");
            return false;
        }

        if !std::fs::symlink_metadata(target).is_ok_and(|m| m.is_file()) {
            warn!("Target {target} exists but is not a symlink or a regular file, skipping");
            return false;
        }

        if let Ok(source_dest) = std::fs::read_link(source) {
            // The dotfile is itself a symlink but the target is not.
            let answer = self.input.request(
                "y/N/a",
                &format!(
                    "{target} already exists, replace it with a link to '{}'?",
                    source_dest.display()
                ),
            );
            return match answer {
                'y' => self.replace(target, source),
                'a' => self.adopt(target, source),
                _ => {
                    info!("Skipping {target}");
                    false
                }
            };
        }

        if files_identical(target, source) {
            return self.replace(target, source);
        }

        loop {
            let answer = self.input.request(
                "y/N/d/a",
                &format!("{target} already exists and differs from {source}, replace it?"),
            );
            match answer {
                'y' => return self.replace(target, source),
                'd' => self.show_diff(target, source),
                'a' => return self.adopt(target, source),
                _ => {
                    info!("Skipping {target}");
                    return false;
                }
            }
        }
    }

    fn replace(&self, target: &AbsolutePath, source: &AbsolutePath) -> bool {
        match fsops::replace_with_link(target, source, self.link_mode) {
            Ok(()) => true,
            Err(err) => {
                warn!("Error replacing {target}: {err}");
                false
            }
        }
    }

    fn adopt(&self, target: &AbsolutePath, source: &AbsolutePath) -> bool {
        match fsops::adopt_changes(target, source, self.link_mode) {
            Ok(()) => {
                info!("Adopted local changes from {target} into {source}");
                true
            }
            Err(err) => {
                warn!("Error adopting changes from {target}: {err}");
                false
            }
        }
    }

    fn show_diff(&self, target: &AbsolutePath, source: &AbsolutePath) {
        let result = exec::run_command_line(
            self.source_base.as_path(),
            &self.diff_command,
            &[source.as_path(), target.as_path()],
        );
        if let Err(err) = result {
            warn!("Error running '{}': {err}", self.diff_command);
        }
    }

    /// The links that should be recorded in the cache after this run:
    /// everything in the mapping except targets that were skipped.
    #[must_use]
    pub fn installed_links(&self) -> Vec<LinkEntry> {
        let mut links: Vec<LinkEntry> = self
            .mapping
            .iter()
            .filter(|(target, _)| !self.targets_skipped.contains(target))
            .map(|(target, source)| LinkEntry::new(target, &source.path))
            .collect();
        links.sort();
        links
    }
}

/// Where a repository file installs to, or `None` when it does not
/// install on this host.
fn map_source_to_target(
    path: &RelativePath,
    hostname_filter: &HostnameFilter,
    implicit_dot: bool,
    implicit_dot_ignore: &HashSet<&str>,
) -> Option<(RelativePath, bool)> {
    if hostname_filter.is_ignored(path) {
        return None;
    }
    let (mut target, host_specific) = match hostname_filter.host_specific_prefix_len(path) {
        Some(len) => (path.strip_prefix_len(len), true),
        None => (path.clone(), false),
    };
    if implicit_dot
        && !implicit_dot_ignore.contains(target.top_level_dir())
        && !target.as_str().starts_with('.')
    {
        target = target.prepend(".");
    }
    Some((target.replace(CRYPT_MARKER, ""), host_specific))
}

/// Byte-wise comparison, false on any read error.
fn files_identical(a: &AbsolutePath, b: &AbsolutePath) -> bool {
    match (std::fs::read(a), std::fs::read(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}
