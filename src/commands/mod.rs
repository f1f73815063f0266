pub mod clean;
pub mod install;
pub mod ls;

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::cache::default_cache_path;
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::engine;
use crate::paths::AbsolutePath;

/// Shared state produced by the common command setup sequence.
///
/// Resolves the repository root, loads its configuration, and locates
/// the cache file so each command does not repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    pub root: AbsolutePath,
    pub config: Config,
    pub cache_path: PathBuf,
}

impl CommandSetup {
    /// Locate the repository and load everything a command needs.
    ///
    /// # Errors
    ///
    /// Returns an error if no dotfiles repository can be found, the
    /// configuration file fails to parse, or no cache location can be
    /// derived.
    pub fn init(global: &GlobalOpts) -> Result<Self> {
        let root = engine::find_dotfiles_dir(global.root.clone())?;
        debug!("Using dotfiles repository {root}");
        let config = Config::load(&root)?;
        let cache_path = default_cache_path()?;
        debug!("Using cache file {}", cache_path.display());
        Ok(Self {
            root,
            config,
            cache_path,
        })
    }
}

/// Print the run summary to stdout unless `--quiet` was given.
fn report_outcome(outcome: &engine::RunOutcome, quiet: bool) -> Result<()> {
    if quiet {
        return Ok(());
    }
    let home = dirs::home_dir()
        .and_then(|h| AbsolutePath::new(h).ok());
    engine::changes::write_changes(
        &mut std::io::stdout().lock(),
        &outcome.added,
        &outcome.removed,
        home.as_ref(),
    )?;
    Ok(())
}
