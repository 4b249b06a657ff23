//! Key options string parsing
//!
//! Options prefix a key line as a comma-separated list of bare flags
//! (`no-pty`) and keyed values (`from="10.0.0.1"`).

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// One or more commas between options
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^,+").unwrap());

/// `name="value"`, the value may contain backslash-escaped characters
static KEYED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^([a-z0-9-]+)="((?:[^"\\]|\\.)*)""#).unwrap());

/// A bare option name
static BARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9-]+").unwrap());

/// Ordered mapping of option name to optional value
///
/// Insertion order is kept; a repeated name overwrites the earlier value in
/// place. Values are stored exactly as written between the quotes, escapes
/// included, so rendering reproduces them unchanged.
#[derive(Debug, Clone, Default)]
pub struct KeyOptions {
    entries: Vec<(String, Option<String>)>,
}

impl KeyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an options string
    ///
    /// An empty string yields no options. Fails with
    /// [`Error::InvalidOptionString`] when part of the input matches none of
    /// separator, keyed option or bare option.
    pub fn parse(input: &str) -> Result<Self> {
        let mut options = Self::new();
        let mut pos = 0;

        while pos < input.len() {
            let rest = &input[pos..];

            if let Some(m) = SEPARATOR.find(rest) {
                pos += m.end();
            } else if let Some(caps) = KEYED.captures(rest) {
                options.insert(&caps[1], Some(caps[2].to_string()));
                pos += caps[0].len();
            } else if let Some(m) = BARE.find(rest) {
                options.insert(m.as_str(), None);
                pos += m.end();
            } else {
                return Err(Error::InvalidOptionString(format!(
                    "unexpected input at position {} in '{}'",
                    pos, input
                )));
            }
        }

        Ok(options)
    }

    /// Set an option, replacing the value of an existing one with the same name
    pub fn insert(&mut self, name: &str, value: Option<String>) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Entries ordered by name, the order used when rendering
    pub fn sorted(&self) -> Vec<(&str, Option<&str>)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort();
        sorted
    }
}

impl PartialEq for KeyOptions {
    /// Options compare as sets of name/value pairs
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Eq for KeyOptions {}

impl fmt::Display for KeyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match value {
                Some(v) => write!(f, "{}=\"{}\"", name, v)?,
                None => f.write_str(name)?,
            }
        }
        Ok(())
    }
}
