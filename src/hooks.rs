//! User hook scripts (`<root>/doot/hooks/<name>/`).
//!
//! Every executable in a hook directory is run in lexical order with
//! the dotfiles root as working directory. A missing directory means no
//! hooks; a failing script aborts the run.

use tracing::{debug, info, warn};

use crate::consts::INTERNAL_DIR;
use crate::error::HookError;
use crate::exec;
use crate::paths::AbsolutePath;

/// Run all hooks registered under `name` ("before-update" or
/// "after-update").
pub fn run_hooks(root: &AbsolutePath, name: &str) -> Result<(), HookError> {
    let hooks_dir = root.as_path().join(INTERNAL_DIR).join("hooks").join(name);
    let entries = match std::fs::read_dir(&hooks_dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("No {name} hooks ({err})");
            return Ok(());
        }
    };

    let mut scripts: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .collect();
    scripts.sort();

    for script in scripts {
        if script.is_dir() {
            warn!("Skipping {}: not a file", script.display());
            continue;
        }
        info!("Running {name} hook {}", script.display());
        let status = exec::run_interactive(root.as_path(), &script, &[]).map_err(|source| {
            HookError::Spawn {
                path: script.clone(),
                source,
            }
        })?;
        if !status.success() {
            return Err(HookError::Failed {
                path: script,
                code: status.code(),
            });
        }
    }
    Ok(())
}
