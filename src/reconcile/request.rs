//! Desired state requests

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether the requested keys should be in the file or not
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    #[default]
    Present,
    Absent,
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyState::Present => write!(f, "present"),
            KeyState::Absent => write!(f, "absent"),
        }
    }
}

impl FromStr for KeyState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "present" => Ok(KeyState::Present),
            "absent" => Ok(KeyState::Absent),
            other => Err(Error::Config(format!(
                "Unknown state '{}', expected 'present' or 'absent'",
                other
            ))),
        }
    }
}

/// A set of key lines and the state they should end up in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Raw key lines, applied in order
    pub lines: Vec<String>,
    pub state: KeyState,
    /// Options prepended to every line before parsing
    pub shared_options: Option<String>,
    /// Remove every other key entry from the file (present state only)
    pub exclusive: bool,
}

impl Request {
    pub fn new(lines: Vec<String>, state: KeyState) -> Self {
        Self {
            lines,
            state,
            ..Self::default()
        }
    }

    /// Build a request from newline-delimited text
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_text(text: &str, state: KeyState) -> Self {
        Self::new(split_lines(text), state)
    }

    pub fn with_shared_options(mut self, options: Option<String>) -> Self {
        self.shared_options = options.filter(|o| !o.is_empty());
        self
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// The line as it is handed to the parser
    pub(crate) fn effective_line(&self, line: &str) -> String {
        match &self.shared_options {
            Some(options) => format!("{} {}", options, line),
            None => line.to_string(),
        }
    }
}

/// Split newline-delimited key text into individual key lines
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parse() {
        assert_eq!("present".parse::<KeyState>().unwrap(), KeyState::Present);
        assert_eq!("absent".parse::<KeyState>().unwrap(), KeyState::Absent);
        assert!("gone".parse::<KeyState>().is_err());
        assert_eq!(KeyState::default(), KeyState::Present);
    }

    #[test]
    fn test_from_text() {
        let request = Request::from_text(
            "ssh-rsa AAAAKEY1 a\n\n# note\n  ssh-rsa AAAAKEY2 b  \n",
            KeyState::Present,
        );
        assert_eq!(request.lines, vec!["ssh-rsa AAAAKEY1 a", "ssh-rsa AAAAKEY2 b"]);
    }

    #[test]
    fn test_effective_line() {
        let request = Request::new(vec![], KeyState::Present)
            .with_shared_options(Some("no-pty".to_string()));
        assert_eq!(request.effective_line("ssh-rsa K"), "no-pty ssh-rsa K");

        let request =
            Request::new(vec![], KeyState::Present).with_shared_options(Some(String::new()));
        assert_eq!(request.effective_line("ssh-rsa K"), "ssh-rsa K");
    }
}
