//! Path newtypes used throughout the engine.
//!
//! [`AbsolutePath`] is validated at construction so the rest of the code
//! can join and compare without re-checking. [`RelativePath`] is a
//! forward-slash-normalized path relative to the dotfiles root (or the
//! target root), produced by the scanner and consumed by the mapper.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error returned when an [`AbsolutePath`] is built from relative input.
#[derive(Error, Debug)]
#[error("not an absolute path: {0}")]
pub struct NotAbsolute(pub String);

/// An absolute filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbsolutePath(PathBuf);

impl AbsolutePath {
    /// Wrap `path`, rejecting relative input.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, NotAbsolute> {
        let path = path.into();
        if path.is_absolute() {
            Ok(Self(path))
        } else {
            Err(NotAbsolute(path.display().to_string()))
        }
    }

    /// Borrow as a plain [`Path`].
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Join a single component or sub-path.
    #[must_use]
    pub fn join(&self, other: impl AsRef<Path>) -> Self {
        Self(self.0.join(other))
    }

    /// Join a scanner-produced relative path.
    #[must_use]
    pub fn join_relative(&self, rel: &RelativePath) -> Self {
        Self(self.0.join(rel.as_str()))
    }

    /// Parent directory, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.parent().map(|p| Self(p.to_path_buf()))
    }

    /// True if `self` starts with `prefix` (component-wise).
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Sibling path with `suffix` appended to the file name, used for
    /// staged replacements.
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let mut s = self.0.as_os_str().to_os_string();
        s.push(suffix);
        Self(PathBuf::from(s))
    }

    /// Lossy string form, used for cache persistence and link contents.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

impl fmt::Display for AbsolutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for AbsolutePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// A forward-slash-normalized path relative to some root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First path component (the whole path when there is no separator).
    #[must_use]
    pub fn top_level_dir(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// Drop the first `prefix_len` bytes (a directory prefix including
    /// its trailing separator).
    #[must_use]
    pub fn strip_prefix_len(&self, prefix_len: usize) -> Self {
        Self(self.0.get(prefix_len..).unwrap_or_default().to_string())
    }

    /// True if the path starts with `prefix` (byte-wise; callers pass
    /// prefixes ending in `/`).
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Replace every occurrence of `needle` (used to strip the
    /// encrypted-file marker from all components at once).
    #[must_use]
    pub fn replace(&self, needle: &str, replacement: &str) -> Self {
        Self(self.0.replace(needle, replacement))
    }

    /// Prepend a literal string (no separator is inserted).
    #[must_use]
    pub fn prepend(&self, prefix: &str) -> Self {
        Self(format!("{prefix}{}", self.0))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
