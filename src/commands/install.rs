use anyhow::Result;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::commands::{CommandSetup, report_outcome};
use crate::engine::{self, RunParams};
use crate::prompt::TerminalInput;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the repository cannot be located, configuration
/// is invalid, a hook fails, or the cache cannot be saved.
pub fn run(global: &GlobalOpts, opts: &InstallOpts) -> Result<()> {
    let setup = CommandSetup::init(global)?;
    let input = TerminalInput;
    let outcome = engine::install(&RunParams {
        root: setup.root,
        config: &setup.config,
        cache_path: &setup.cache_path,
        full_clean: opts.full_clean,
        input: &input,
    })?;
    report_outcome(&outcome, global.quiet)
}
