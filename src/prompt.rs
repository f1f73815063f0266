//! Interactive conflict prompts.
//!
//! The engine never answers questions itself; it asks an
//! [`InputProvider`]. The terminal implementation reads stdin, tests
//! inject a scripted one.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::Mutex;

use tracing::warn;

/// Source of answers to yes/no style prompts.
///
/// `options` is a slash-separated set such as `"y/N"` or `"y/N/d/a"`.
/// The uppercase option is the default, chosen on empty input or EOF.
pub trait InputProvider {
    /// One line of input, without the trailing newline. `None` on EOF.
    fn read_response(&self) -> Option<String>;

    /// Ask the user `prompt`, returning the selected option lowercased.
    fn request(&self, options: &str, prompt: &str) -> char {
        let choices: Vec<char> = options
            .split('/')
            .filter_map(|o| o.chars().next())
            .collect();
        let default = choices
            .iter()
            .find(|c| c.is_uppercase())
            .copied()
            .unwrap_or('n')
            .to_ascii_lowercase();

        eprint!("{prompt} [{options}] ");
        let answer = self
            .read_response()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if answer.is_empty() {
            return default;
        }
        let selected = answer.chars().next().unwrap_or(default);
        if choices
            .iter()
            .any(|c| c.to_ascii_lowercase() == selected)
        {
            selected
        } else {
            warn!("Unrecognized response '{answer}', assuming '{default}'");
            default
        }
    }
}

/// Reads answers from stdin.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputProvider for TerminalInput {
    fn read_response(&self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// Replays a fixed sequence of answers. Once the script runs out every
/// further read returns EOF, so prompts fall back to their default.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
        }
    }
}

impl InputProvider for ScriptedInput {
    fn read_response(&self) -> Option<String> {
        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_answer_is_returned_lowercased() {
        let input = ScriptedInput::new(["Y"]);
        assert_eq!(input.request("y/N", "Replace?"), 'y');
    }

    #[test]
    fn empty_answer_selects_the_uppercase_default() {
        let input = ScriptedInput::new([""]);
        assert_eq!(input.request("y/N", "Replace?"), 'n');
    }

    #[test]
    fn eof_selects_the_default() {
        let input = ScriptedInput::new(Vec::<String>::new());
        assert_eq!(input.request("y/N/d/a", "Replace?"), 'n');
    }

    #[test]
    fn answer_outside_the_option_set_falls_back_to_default() {
        let input = ScriptedInput::new(["x"]);
        assert_eq!(input.request("y/N/d/a", "Replace?"), 'n');
    }

    #[test]
    fn extended_options_are_accepted() {
        let input = ScriptedInput::new(["d", "a", "y"]);
        assert_eq!(input.request("y/N/d/a", "Replace?"), 'd');
        assert_eq!(input.request("y/N/d/a", "Replace?"), 'a');
        assert_eq!(input.request("y/N/d/a", "Replace?"), 'y');
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let input = ScriptedInput::new(["  y  "]);
        assert_eq!(input.request("y/N", "Replace?"), 'y');
    }
}
