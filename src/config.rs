//! Repository configuration (`<root>/doot/config.toml`).
//!
//! The file is optional; every field has a default. Parsing uses serde
//! and TOML, validation happens once at load time so the engine can
//! treat the values as trusted afterwards.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, error};

use crate::consts::INTERNAL_DIR;
use crate::error::ConfigError;
use crate::paths::{AbsolutePath, RelativePath};

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the links are installed into (normally `$HOME`).
    pub target_dir: AbsolutePath,
    /// Glob patterns (relative to the dotfiles root) to skip.
    pub exclude_files: Vec<String>,
    /// Glob patterns that are always installed, overriding every
    /// exclusion rule.
    pub include_files: Vec<String>,
    /// Descend into excluded directories so deeply nested
    /// `include_files` patterns can still be reached.
    pub explore_excluded_dirs: bool,
    /// Prefix top-level entries with a dot when mapping
    /// (`config/foo` installs as `.config/foo`).
    pub implicit_dot: bool,
    /// Top-level names exempt from `implicit_dot`.
    pub implicit_dot_ignore: Vec<String>,
    /// Host name → host-specific overlay directory.
    pub hosts: BTreeMap<String, String>,
    /// Command used to show a diff during conflict prompts; both file
    /// paths are appended.
    pub diff_command: String,
    /// Install hardlinks instead of symlinks.
    pub use_hardlinks: bool,
}

/// On-disk shape of the config file before expansion and validation.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    target_dir: String,
    exclude_files: Vec<String>,
    include_files: Vec<String>,
    explore_excluded_dirs: bool,
    implicit_dot: bool,
    implicit_dot_ignore: Vec<String>,
    hosts: BTreeMap<String, String>,
    diff_command: String,
    use_hardlinks: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            target_dir: "~".to_string(),
            exclude_files: vec![
                "**/.*".to_string(),
                "LICENSE".to_string(),
                "README.md".to_string(),
            ],
            include_files: Vec::new(),
            explore_excluded_dirs: false,
            implicit_dot: false,
            implicit_dot_ignore: Vec::new(),
            hosts: BTreeMap::new(),
            diff_command: "diff -u".to_string(),
            use_hardlinks: false,
        }
    }
}

impl Config {
    /// Load the configuration from a dotfiles root. A missing or
    /// unreadable file falls back to the defaults; a file that exists
    /// but does not parse is a fatal error.
    pub fn load(root: &AbsolutePath) -> Result<Self, ConfigError> {
        Self::load_file(&root.as_path().join(INTERNAL_DIR).join("config.toml"))
    }

    /// Load from an explicit file path.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(contents) => {
                toml::from_str::<RawConfig>(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(err) => {
                debug!("Config file {} not read ({err}), using defaults", path.display());
                RawConfig::default()
            }
        };
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let expanded = expand_home(&raw.target_dir)?;
        let target_dir = AbsolutePath::new(expanded)
            .map_err(|e| ConfigError::TargetDirNotAbsolute(e.0))?;

        for entry in &raw.implicit_dot_ignore {
            if entry.contains('/') {
                return Err(ConfigError::ImplicitDotIgnoreNested {
                    entry: entry.clone(),
                    top_level: RelativePath::new(entry.clone()).top_level_dir().to_string(),
                });
            }
        }

        Ok(Self {
            target_dir,
            exclude_files: raw.exclude_files,
            include_files: raw.include_files,
            explore_excluded_dirs: raw.explore_excluded_dirs,
            implicit_dot: raw.implicit_dot,
            implicit_dot_ignore: raw.implicit_dot_ignore,
            hosts: raw.hosts,
            diff_command: raw.diff_command,
            use_hardlinks: raw.use_hardlinks,
        })
    }
}

/// Expand a leading `~` or `$HOME` in the configured target directory.
/// Other environment variables are intentionally not expanded.
fn expand_home(path: &str) -> Result<PathBuf, ConfigError> {
    let rest = if path == "~" || path == "$HOME" {
        Some("")
    } else if let Some(rest) = path.strip_prefix("~/") {
        Some(rest)
    } else if let Some(rest) = path.strip_prefix("$HOME/") {
        Some(rest)
    } else {
        None
    };

    match rest {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| {
                error!("Cannot expand '{path}': home directory unknown");
                ConfigError::HomeNotFound
            })?;
            Ok(if rest.is_empty() { home } else { home.join(rest) })
        }
        None => Ok(PathBuf::from(path)),
    }
}
