//! Authorized keys file model and persistence
//!
//! A [`KeyFile`] keeps every line of the file in its original order. Lines
//! that parse as keys are indexed by key material; everything else, line
//! terminator included, is kept as raw bytes so it is written back byte for
//! byte. Content does not have to be valid UTF-8.

pub mod location;
mod persist;

pub use location::{Account, KeyLocation};
pub use persist::{load, save};

use crate::keys::{KeyEntry, KeyTypeSet};
use std::collections::HashMap;

/// How a line was terminated in the source content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    /// Last line of content without a final newline
    Missing,
}

impl LineEnding {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
            LineEnding::Missing => b"",
        }
    }

    /// Split a line into its body and terminator
    fn split(line: &[u8]) -> (&[u8], Self) {
        if let Some(body) = line.strip_suffix(b"\r\n") {
            (body, LineEnding::CrLf)
        } else if let Some(body) = line.strip_suffix(b"\n") {
            (body, LineEnding::Lf)
        } else {
            (line, LineEnding::Missing)
        }
    }
}

/// A single line of an authorized keys file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A parsed key entry and the terminator it is written with
    Key { entry: KeyEntry, ending: LineEnding },
    /// Original bytes of a line that is not a key, terminator included
    Raw(Vec<u8>),
}

impl Line {
    /// Append the rendered line to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Line::Key { entry, ending } => {
                out.extend_from_slice(entry.to_string().as_bytes());
                out.extend_from_slice(ending.as_bytes());
            }
            Line::Raw(bytes) => out.extend_from_slice(bytes),
        }
    }
}

/// Ordered lines of an authorized keys file with an index by key material
///
/// At most one [`Line::Key`] exists per key material.
#[derive(Debug, Clone, Default)]
pub struct KeyFile {
    lines: Vec<Line>,
    index: HashMap<String, usize>,
    /// Terminator for newly added entries, taken from the first line
    newline: LineEnding,
}

impl KeyFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a key file from raw content
    ///
    /// Lines that are not valid UTF-8 or whose options cannot be parsed are
    /// kept as raw lines. When the same key material appears more than once,
    /// the entry stays at the position of its first occurrence and takes the
    /// attributes of the last.
    pub fn parse(content: impl AsRef<[u8]>, types: &KeyTypeSet) -> Self {
        let mut file = Self::new();

        for (number, chunk) in content.as_ref().split_inclusive(|&b| b == b'\n').enumerate() {
            let (body, ending) = LineEnding::split(chunk);
            if number == 0 && ending != LineEnding::Missing {
                file.newline = ending;
            }

            let parsed = match std::str::from_utf8(body) {
                Ok(text) => KeyEntry::parse(text, types),
                Err(_) => {
                    tracing::debug!(line = number + 1, "Keeping non UTF-8 line verbatim");
                    Ok(None)
                }
            };

            match parsed {
                Ok(Some(entry)) => {
                    if file.contains(&entry.key_material) {
                        tracing::warn!(
                            line = number + 1,
                            "Duplicate key material, keeping the last occurrence"
                        );
                    }
                    file.insert(entry, ending);
                }
                Ok(None) => file.lines.push(Line::Raw(chunk.to_vec())),
                Err(e) => {
                    tracing::debug!(line = number + 1, "Keeping unparsable line verbatim: {}", e);
                    file.lines.push(Line::Raw(chunk.to_vec()));
                }
            }
        }

        file
    }

    /// Look up an entry by key material
    pub fn get(&self, key_material: &str) -> Option<&KeyEntry> {
        match self.index.get(key_material).map(|&i| &self.lines[i]) {
            Some(Line::Key { entry, .. }) => Some(entry),
            _ => None,
        }
    }

    pub fn contains(&self, key_material: &str) -> bool {
        self.index.contains_key(key_material)
    }

    /// Insert an entry or replace the one with the same key material in place
    ///
    /// A replaced entry keeps its line terminator; a new one is appended with
    /// the file's terminator. Returns the entry that was replaced, if any.
    pub fn upsert(&mut self, entry: KeyEntry) -> Option<KeyEntry> {
        let ending = self.newline;
        self.insert(entry, ending)
    }

    fn insert(&mut self, entry: KeyEntry, ending: LineEnding) -> Option<KeyEntry> {
        match self.index.get(&entry.key_material).copied() {
            Some(i) => {
                let ending = match &self.lines[i] {
                    Line::Key { ending, .. } => *ending,
                    Line::Raw(_) => ending,
                };
                match std::mem::replace(&mut self.lines[i], Line::Key { entry, ending }) {
                    Line::Key { entry: old, .. } => Some(old),
                    Line::Raw(_) => None,
                }
            }
            None => {
                self.index.insert(entry.key_material.clone(), self.lines.len());
                self.lines.push(Line::Key { entry, ending });
                None
            }
        }
    }

    /// Remove the entry with the given key material
    pub fn remove(&mut self, key_material: &str) -> Option<KeyEntry> {
        let i = self.index.remove(key_material)?;
        let removed = self.lines.remove(i);
        self.reindex();
        match removed {
            Line::Key { entry, .. } => Some(entry),
            Line::Raw(_) => None,
        }
    }

    /// Keep only the key entries for which the predicate holds
    ///
    /// Raw lines are never removed. Returns the removed entries in file order.
    pub fn retain_keys<F>(&mut self, mut keep: F) -> Vec<KeyEntry>
    where
        F: FnMut(&KeyEntry) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.lines.len());
        for line in self.lines.drain(..) {
            match line {
                Line::Key { entry, .. } if !keep(&entry) => removed.push(entry),
                other => kept.push(other),
            }
        }
        self.lines = kept;
        self.reindex();
        removed
    }

    fn reindex(&mut self) {
        self.index = self
            .lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| match line {
                Line::Key { entry, .. } => Some((entry.key_material.clone(), i)),
                Line::Raw(_) => None,
            })
            .collect();
    }

    /// All lines in file order
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Key entries in file order
    pub fn keys(&self) -> impl Iterator<Item = &KeyEntry> {
        self.lines.iter().filter_map(|line| match line {
            Line::Key { entry, .. } => Some(entry),
            Line::Raw(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Serialize to file content
    ///
    /// Every line is written with its own terminator. A line that lost its
    /// place as the last one gets the file's terminator before the next.
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for line in &self.lines {
            if out.last().is_some_and(|&b| b != b'\n') {
                out.extend_from_slice(self.newline.as_bytes());
            }
            line.write_to(&mut out);
        }
        out
    }
}
