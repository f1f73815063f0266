//! Fixed names and conventions shared across the crate.

/// Marker substring inserted into a path component to flag it as
/// encrypted at rest (e.g. `secret.doot-crypt.txt`). The engine only
/// strips it when computing target names and suppresses marked files
/// while the repository's encryption is not initialised.
pub const CRYPT_MARKER: &str = ".doot-crypt";

/// Suffix for the temporary sibling used when atomically replacing an
/// existing target with a link.
pub const BACKUP_SUFFIX: &str = ".doot-backup";

/// Directory inside the dotfiles root reserved for doot itself
/// (configuration and hooks). Never installed.
pub const INTERNAL_DIR: &str = "doot";

/// Exclude pattern with a dedicated fast path: hidden-file suppression.
pub const IGNORE_HIDDEN_GLOB: &str = "**/.*";

/// Environment variable overriding dotfiles root discovery.
pub const ENV_DOOT_DIR: &str = "DOOT_DIR";

/// Environment variable overriding the cache file's directory.
pub const ENV_DOOT_CACHE_DIR: &str = "DOOT_CACHE_DIR";
