use anyhow::Result;

use crate::cli::{CleanOpts, GlobalOpts};
use crate::commands::{CommandSetup, report_outcome};
use crate::engine::{self, RunParams};
use crate::prompt::TerminalInput;

/// Run the clean command: remove every installed link.
///
/// # Errors
///
/// Returns an error if the repository cannot be located, a hook fails,
/// or the cache cannot be saved.
pub fn run(global: &GlobalOpts, opts: &CleanOpts) -> Result<()> {
    let setup = CommandSetup::init(global)?;
    let input = TerminalInput;
    let outcome = engine::clean(&RunParams {
        root: setup.root,
        config: &setup.config,
        cache_path: &setup.cache_path,
        full_clean: opts.full_clean,
        input: &input,
    })?;
    report_outcome(&outcome, global.quiet)
}
