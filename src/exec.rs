//! Running external programs with inherited stdio.

use std::path::Path;
use std::process::{Command, ExitStatus};

use tracing::debug;

/// Run `program` with `args`, working directory `dir`, terminal
/// attached. Used for hook scripts.
pub fn run_interactive(
    dir: &Path,
    program: &Path,
    args: &[&str],
) -> std::io::Result<ExitStatus> {
    debug!("Running {} in {}", program.display(), dir.display());
    Command::new(program).args(args).current_dir(dir).status()
}

/// Run a whitespace-separated command line such as `diff -u`, appending
/// `extra` as trailing arguments. Used for the configured diff command
/// during conflict prompts.
pub fn run_command_line(
    dir: &Path,
    command_line: &str,
    extra: &[&Path],
) -> std::io::Result<ExitStatus> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line")
    })?;
    debug!("Running '{command_line}' in {}", dir.display());
    Command::new(program)
        .args(parts)
        .args(extra)
        .current_dir(dir)
        .status()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_line_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_command_line(dir.path(), "   ", &[]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn command_line_splits_program_and_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let status = run_command_line(dir.path(), "true", &[]).unwrap();
        assert!(status.success());
        let status = run_command_line(dir.path(), "false", &[]).unwrap();
        assert!(!status.success());
    }

    #[cfg(unix)]
    #[test]
    fn interactive_run_uses_the_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("probe"), b"").unwrap();
        let status =
            run_interactive(dir.path(), Path::new("/usr/bin/test"), &["-e", "probe"]).unwrap();
        assert!(status.success());
    }
}
