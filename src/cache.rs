//! Persistent record of previously installed links.
//!
//! The cache is a single versioned binary file. Several
//! (dotfiles-root, target-root) pairs can coexist in it, each under its
//! own composite key. A cache that cannot be read, parsed, or whose
//! version does not match is treated as empty — the engine then re-derives
//! everything from the live filesystem, which costs one full re-link but
//! never a crash and never a destructive "repair".

use std::path::{Path, PathBuf};

use bincode::{Decode, Encode};
use tracing::{debug, info, warn};

use crate::consts::ENV_DOOT_CACHE_DIR;
use crate::error::CacheError;
use crate::paths::AbsolutePath;

/// Bump when the on-disk layout changes; older files degrade to empty.
pub const CACHE_VERSION: u32 = 1;

/// File name inside the cache directory.
pub const CACHE_FILE_NAME: &str = "doot-cache.bin";

/// One installed link: where it lives and what it points at. For
/// symlinks `content` is the recorded link destination; for hardlinks
/// it is the absolute path of the dotfile sharing the inode.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Encode, Decode)]
pub struct LinkEntry {
    pub path: String,
    pub content: String,
}

impl LinkEntry {
    #[must_use]
    pub fn new(path: &AbsolutePath, content: &AbsolutePath) -> Self {
        Self {
            path: path.to_string_lossy(),
            content: content.to_string_lossy(),
        }
    }
}

/// The links installed for one (dotfiles-root, target-root) pair.
#[derive(Debug, Clone, Encode, Decode)]
pub struct CacheEntry {
    pub key: String,
    pub links: Vec<LinkEntry>,
}

/// The whole cache file.
#[derive(Debug, Encode, Decode)]
pub struct Cache {
    pub version: u32,
    pub entries: Vec<CacheEntry>,
}

impl Cache {
    /// A cache with no recorded links.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: Vec::new(),
        }
    }

    /// Load the cache from `path`. Every failure mode degrades to an
    /// empty cache; the next successful save overwrites the file
    /// wholesale.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!("Cache read error: {err}, starting with an empty cache");
                return Self::empty();
            }
        };
        let cache: Self =
            match bincode::decode_from_slice(&bytes, bincode::config::standard()) {
                Ok((cache, _)) => cache,
                Err(err) => {
                    warn!("Error parsing cache file: {err}, starting with an empty cache");
                    return Self::empty();
                }
            };
        if cache.version != CACHE_VERSION {
            info!(
                "Cache version mismatch: expected {CACHE_VERSION}, got {}, starting with an empty cache",
                cache.version
            );
            return Self::empty();
        }
        cache
    }

    /// Write the cache to `path`, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| CacheError::DirCreate {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let bytes = bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|err| CacheError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::other(err),
            })?;
        std::fs::write(path, bytes).map_err(|source| CacheError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The entry for `key`, created empty if absent.
    pub fn entry_mut(&mut self, key: &str) -> &mut CacheEntry {
        if let Some(i) = self.entries.iter().position(|e| e.key == key) {
            &mut self.entries[i]
        } else {
            self.entries.push(CacheEntry {
                key: key.to_string(),
                links: Vec::new(),
            });
            let last = self.entries.len() - 1;
            &mut self.entries[last]
        }
    }
}

/// Composite key scoping a cache entry to one run configuration.
#[must_use]
pub fn cache_key(source_root: &AbsolutePath, target_root: &AbsolutePath) -> String {
    format!(
        "{}:{}",
        source_root.to_string_lossy(),
        target_root.to_string_lossy()
    )
}

/// Location of the cache file: `$DOOT_CACHE_DIR` when set, otherwise
/// the platform cache directory (`~/.cache/doot` on Linux).
pub fn default_cache_path() -> Result<PathBuf, CacheError> {
    if let Ok(dir) = std::env::var(ENV_DOOT_CACHE_DIR)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir).join(CACHE_FILE_NAME));
    }
    let dir = dirs::cache_dir().ok_or(CacheError::NoCacheDir)?;
    Ok(dir.join("doot").join(CACHE_FILE_NAME))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn entry(path: &str, content: &str) -> LinkEntry {
        LinkEntry {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn save_and_reload_reproduces_links_regardless_of_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE_NAME);

        let mut cache = Cache::empty();
        cache.entry_mut("key-a").links = vec![
            entry("/home/u/.bashrc", "/dots/bashrc"),
            entry("/home/u/.vimrc", "/dots/vimrc"),
        ];
        cache.entry_mut("key-b").links = vec![entry("/other/.zshrc", "/dots2/zshrc")];
        cache.save(&path).unwrap();

        let reloaded = Cache::load(&path);
        assert_eq!(reloaded.version, CACHE_VERSION);
        assert_eq!(reloaded.entries.len(), 2);

        let mut loaded = Cache::load(&path);
        let links: BTreeSet<LinkEntry> =
            loaded.entry_mut("key-a").links.iter().cloned().collect();
        let expected: BTreeSet<LinkEntry> = [
            entry("/home/u/.vimrc", "/dots/vimrc"),
            entry("/home/u/.bashrc", "/dots/bashrc"),
        ]
        .into_iter()
        .collect();
        assert_eq!(links, expected);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::load(&dir.path().join("nope.bin"));
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn garbage_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE_NAME);
        std::fs::write(&path, b"\xff\xfe definitely not a cache").unwrap();
        let cache = Cache::load(&path);
        assert!(cache.entries.is_empty());
        assert_eq!(cache.version, CACHE_VERSION);
    }

    #[test]
    fn version_mismatch_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE_NAME);

        let mut cache = Cache::empty();
        cache.entry_mut("key").links = vec![entry("/a", "/b")];
        cache.version = CACHE_VERSION + 1;
        cache.save(&path).unwrap();

        let reloaded = Cache::load(&path);
        assert!(reloaded.entries.is_empty());
    }

    #[test]
    fn entry_mut_creates_then_reuses() {
        let mut cache = Cache::empty();
        cache.entry_mut("k").links.push(entry("/a", "/b"));
        cache.entry_mut("k").links.push(entry("/c", "/d"));
        assert_eq!(cache.entries.len(), 1);
        assert_eq!(cache.entries[0].links.len(), 2);
    }

    #[test]
    fn cache_key_combines_both_roots() {
        let src = AbsolutePath::new("/dots").unwrap();
        let dst = AbsolutePath::new("/home/u").unwrap();
        assert_eq!(cache_key(&src, &dst), "/dots:/home/u");
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join(CACHE_FILE_NAME);
        Cache::empty().save(&path).unwrap();
        assert!(path.exists());
    }
}
