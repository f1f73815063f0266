//! Reusable set of compiled path-glob patterns.

use globset::{GlobBuilder, GlobMatcher};
use tracing::warn;

use crate::paths::RelativePath;

/// A compiled collection of glob patterns. A path matches the
/// collection when it matches any pattern. Patterns that fail to
/// compile are dropped with a warning instead of failing the run.
#[derive(Debug, Default)]
pub struct GlobCollection {
    globs: Vec<GlobMatcher>,
}

impl GlobCollection {
    #[must_use]
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut globs = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            match GlobBuilder::new(&preprocess_pattern(pattern))
                .literal_separator(true)
                .build()
            {
                Ok(glob) => globs.push(glob.compile_matcher()),
                Err(err) => warn!("Ignoring invalid glob pattern '{pattern}': {err}"),
            }
        }
        Self { globs }
    }

    /// True if any pattern matches the full relative path.
    #[must_use]
    pub fn matches(&self, path: &RelativePath) -> bool {
        self.globs.iter().any(|g| g.is_match(path.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }
}

/// `**/` must also match zero intervening directories, so that a
/// pattern like `**/build` covers both `build` and `sub/build`. The
/// glob engine treats `**/` as "one or more segments", so every
/// occurrence is rewritten into an optional group.
fn preprocess_pattern(pattern: &str) -> String {
    pattern.replace("**/", "{,**/}")
}
