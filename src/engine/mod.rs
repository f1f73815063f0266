//! Reconciliation engine.
//!
//! One run: load the cache, run the before-update hooks, build the
//! desired mapping, remove links the repository no longer wants,
//! install the ones it now wants, run the after-update hooks, persist
//! the new link set.

pub mod changes;
pub mod hostname;
pub mod mapping;
pub mod scan;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use tracing::{debug, info};

use crate::cache::{Cache, cache_key};
use crate::config::Config;
use crate::consts::ENV_DOOT_DIR;
use crate::hooks;
use crate::linkmode::LinkMode;
use crate::paths::AbsolutePath;
use crate::prompt::InputProvider;

use self::hostname::HostnameFilter;
use self::mapping::FileMapping;
use self::scan::FileFilter;

/// Everything one engine run needs.
pub struct RunParams<'a> {
    pub root: AbsolutePath,
    pub config: &'a Config,
    pub cache_path: &'a Path,
    /// Distrust the cache and rediscover installed links by walking
    /// the target directory first.
    pub full_clean: bool,
    pub input: &'a dyn InputProvider,
}

/// What a run changed on disk.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub added: Vec<AbsolutePath>,
    pub removed: Vec<AbsolutePath>,
}

/// Install the repository's links, removing stale ones first.
pub fn install(params: &RunParams<'_>) -> anyhow::Result<RunOutcome> {
    let filter = FileFilter::from_config(params.config, crypt_unlocked(&params.root));
    let files = scan::scan_directory(&params.root, &filter);
    debug!("Scanned {} installable files", files.len());
    reconcile(params, &files)
}

/// Remove every link the repository ever installed.
pub fn clean(params: &RunParams<'_>) -> anyhow::Result<RunOutcome> {
    reconcile(params, &[])
}

fn reconcile(
    params: &RunParams<'_>,
    files: &[crate::paths::RelativePath],
) -> anyhow::Result<RunOutcome> {
    let link_mode = LinkMode::from_config(params.config.use_hardlinks)?;
    let mut cache = Cache::load(params.cache_path);
    let key = cache_key(&params.root, &params.config.target_dir);
    let entry = cache.entry_mut(&key);

    if params.full_clean {
        // The cache is distrusted wholesale: the rebuilt entry holds
        // only links actually found on disk.
        let found = link_mode.recalculate_links(&params.root, &params.config.target_dir);
        info!("Recalculated {} installed links from disk", found.len());
        entry.links = found;
    }

    hooks::run_hooks(&params.root, "before-update")?;

    let hostname_filter = HostnameFilter::from_system(&params.config.hosts);
    let mut mapping = FileMapping::new(
        params.root.clone(),
        params.config,
        &hostname_filter,
        link_mode,
        params.input,
        files,
    );

    let removed = mapping.remove_stale_links(&entry.links);
    let added = mapping.install_new_links();

    hooks::run_hooks(&params.root, "after-update")?;

    entry.links = mapping.installed_links();
    cache.save(params.cache_path)?;

    Ok(RunOutcome { added, removed })
}

/// The links currently recorded for this (root, target) pair.
#[must_use]
pub fn recorded_links(
    cache_path: &Path,
    root: &AbsolutePath,
    target: &AbsolutePath,
) -> Vec<crate::cache::LinkEntry> {
    let cache = Cache::load(cache_path);
    let key = cache_key(root, target);
    cache
        .entries
        .into_iter()
        .find(|e| e.key == key)
        .map(|e| e.links)
        .unwrap_or_default()
}

/// Locate the dotfiles repository: explicit flag, then `$DOOT_DIR`,
/// then `$XDG_DATA_HOME/dotfiles`, then `~/.dotfiles`.
pub fn find_dotfiles_dir(explicit: Option<PathBuf>) -> anyhow::Result<AbsolutePath> {
    if let Some(path) = explicit {
        return absolute_existing(&path)
            .with_context(|| format!("dotfiles directory {} not found", path.display()));
    }
    if let Ok(dir) = std::env::var(ENV_DOOT_DIR)
        && !dir.is_empty()
    {
        let path = PathBuf::from(dir);
        return absolute_existing(&path)
            .with_context(|| format!("{ENV_DOOT_DIR}={} not found", path.display()));
    }

    let mut candidates = Vec::new();
    if let Some(data_dir) = data_home() {
        candidates.push(data_dir.join("dotfiles"));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".dotfiles"));
    }
    for candidate in &candidates {
        if candidate.is_dir() {
            return absolute_existing(candidate)
                .with_context(|| format!("cannot resolve {}", candidate.display()));
        }
    }
    bail!("no dotfiles directory found, set {ENV_DOOT_DIR} or use --root");
}

fn data_home() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("XDG_DATA_HOME")
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|h| h.join(".local").join("share"))
}

fn absolute_existing(path: &Path) -> anyhow::Result<AbsolutePath> {
    if !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }
    let absolute = std::path::absolute(path)?;
    Ok(AbsolutePath::new(absolute)?)
}

/// Encrypted dotfiles are installable once the repository's encryption
/// has been unlocked, which leaves a marker directory under `.git`.
#[must_use]
pub fn crypt_unlocked(root: &AbsolutePath) -> bool {
    root.as_path().join(".git").join("git-crypt").is_dir()
}
