//! Change summary printed after a run.

use std::io::Write;

use crate::paths::AbsolutePath;

/// Changes beyond this count are collapsed into a "more" line.
const SHOW_LIMIT: usize = 5;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Render one group of changes ("+" for added, "-" for removed) into
/// display lines. Paths under `home` are shortened to `~/...`.
fn format_group(
    sign: &str,
    color: &str,
    paths: &[AbsolutePath],
    home: Option<&AbsolutePath>,
) -> Vec<String> {
    let mut sorted: Vec<&AbsolutePath> = paths.iter().collect();
    sorted.sort();

    let mut lines = Vec::new();
    for path in sorted.iter().take(SHOW_LIMIT) {
        lines.push(format!("{color}{sign}{RESET} {}", shorten(path, home)));
    }
    if sorted.len() > SHOW_LIMIT {
        lines.push(format!("{color}{sign}{RESET} {} more", sorted.len() - SHOW_LIMIT));
    }
    lines
}

fn shorten(path: &AbsolutePath, home: Option<&AbsolutePath>) -> String {
    if let Some(home) = home
        && path.starts_with(home)
        && let Ok(rel) = path.as_path().strip_prefix(home.as_path())
    {
        return format!("~/{}", rel.display());
    }
    path.to_string_lossy()
}

/// Write the run summary to `out`.
pub fn write_changes(
    out: &mut impl Write,
    added: &[AbsolutePath],
    removed: &[AbsolutePath],
    home: Option<&AbsolutePath>,
) -> std::io::Result<()> {
    if added.is_empty() && removed.is_empty() {
        writeln!(out, "No changes")?;
        return Ok(());
    }
    for line in format_group("+", GREEN, added, home) {
        writeln!(out, "{line}")?;
    }
    for line in format_group("-", RED, removed, home) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn abs(s: &str) -> AbsolutePath {
        AbsolutePath::new(s).unwrap()
    }

    fn render(added: &[AbsolutePath], removed: &[AbsolutePath], home: Option<&AbsolutePath>) -> String {
        let mut buf = Vec::new();
        write_changes(&mut buf, added, removed, home).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn no_changes_says_so() {
        assert_eq!(render(&[], &[], None), "No changes\n");
    }

    #[test]
    fn added_then_removed_sorted_with_home_shortened() {
        let home = abs("/home/u");
        let out = render(
            &[abs("/home/u/.vimrc"), abs("/home/u/.bashrc")],
            &[abs("/etc/old")],
            Some(&home),
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains('+') && lines[0].contains("~/.bashrc"));
        assert!(lines[1].contains('+') && lines[1].contains("~/.vimrc"));
        assert!(lines[2].contains('-') && lines[2].contains("/etc/old"));
    }

    #[test]
    fn long_lists_are_capped_with_a_more_line() {
        let home = abs("/home/u");
        let added: Vec<AbsolutePath> =
            (0..8).map(|i| abs(&format!("/home/u/.f{i}"))).collect();
        let out = render(&added, &[], Some(&home));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[5].contains("3 more"));
    }
}
