//! Domain error types for the reconciliation engine.
//!
//! Modules return these typed errors; the command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] with `?`. Per-item
//! failures during a run (one unreadable file, one failed link) are
//! *not* errors — they are logged and the run continues. Everything
//! here is fatal to the whole run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `target_dir` is not absolute after `~`/`$HOME` expansion.
    #[error("invalid config: 'target_dir = {0}' must be an absolute path")]
    TargetDirNotAbsolute(String),

    /// An `implicit_dot_ignore` entry names a nested path.
    #[error(
        "invalid config: 'implicit_dot_ignore -> {entry}' must be a top-level file or directory, consider adding '{top_level}' instead"
    )]
    ImplicitDotIgnoreNested {
        /// The offending entry.
        entry: String,
        /// Its top-level component, suggested as a replacement.
        top_level: String,
    },

    /// The config file exists but is not valid TOML.
    #[error("error parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The home directory cannot be resolved (needed for `~` expansion
    /// and the default target).
    #[error("cannot determine home directory")]
    HomeNotFound,
}

/// Errors from cache persistence. Corrupt cache *content* is never an
/// error (it degrades to an empty cache); only the surrounding I/O is.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache directory could not be created.
    #[error("error creating cache directory {}: {source}", path.display())]
    DirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cache file could not be written.
    #[error("error saving cache file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No cache directory is configured and none could be derived.
    #[error("cannot determine cache directory, set DOOT_CACHE_DIR")]
    NoCacheDir,
}

/// Errors from hook execution. Any hook failure aborts the run.
#[derive(Error, Debug)]
pub enum HookError {
    /// The hook script could not be started.
    #[error("error running hook {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The hook script exited with a non-zero status.
    #[error("hook {} failed with exit code {code:?}", path.display())]
    Failed { path: PathBuf, code: Option<i32> },
}

/// Errors from link-strategy selection.
#[derive(Error, Debug)]
pub enum LinkModeError {
    /// Hardlink identity needs inode semantics, which this platform
    /// does not expose.
    #[error("use_hardlinks is not supported on this platform")]
    HardlinksUnsupported,
}
