//! Applying a request to a loaded key file

use crate::error::{Error, Result};
use crate::keys::{KeyEntry, KeyTypeSet};
use crate::reconcile::{KeyState, Request};
use crate::store::KeyFile;
use serde::Serialize;
use std::collections::HashSet;

/// A single modification made to a key file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "key", rename_all = "snake_case")]
pub enum Change {
    Added(String),
    Replaced(String),
    Removed(String),
}

/// Parse every requested line, failing on the first one that is not a key
///
/// An exclusive present request without any key is rejected, since applying
/// it would remove every key in the file.
pub fn parse_request(request: &Request, types: &KeyTypeSet) -> Result<Vec<KeyEntry>> {
    if request.exclusive && request.state == KeyState::Present && request.lines.is_empty() {
        return Err(Error::InvalidKeySpec {
            line: String::new(),
            reason: "exclusive request without any keys would remove every key".to_string(),
        });
    }

    request
        .lines
        .iter()
        .map(|line| {
            let effective = request.effective_line(line);
            match KeyEntry::parse(&effective, types) {
                Ok(Some(entry)) => Ok(entry),
                Ok(None) => Err(Error::InvalidKeySpec {
                    line: line.clone(),
                    reason: "no recognized key type followed by key material".to_string(),
                }),
                Err(e) => Err(Error::InvalidKeySpec {
                    line: line.clone(),
                    reason: e.to_string(),
                }),
            }
        })
        .collect()
}

/// Apply a request to a key file
///
/// All requested lines are validated before the file is touched, so an
/// invalid line leaves `file` unchanged. Returns the changes made in order;
/// an empty list means the file already matched.
pub fn apply(file: &mut KeyFile, request: &Request, types: &KeyTypeSet) -> Result<Vec<Change>> {
    let entries = parse_request(request, types)?;
    let mut changes = Vec::new();

    match request.state {
        KeyState::Present => {
            for entry in &entries {
                let material = entry.key_material.clone();
                match file.get(&material).map(|existing| existing == entry) {
                    Some(true) => {
                        tracing::debug!(key = %material, "Key already present");
                    }
                    Some(false) => {
                        file.upsert(entry.clone());
                        tracing::debug!(key = %material, "Replacing key");
                        changes.push(Change::Replaced(material));
                    }
                    None => {
                        file.upsert(entry.clone());
                        tracing::debug!(key = %material, "Adding key");
                        changes.push(Change::Added(material));
                    }
                }
            }

            if request.exclusive {
                let wanted: HashSet<&str> =
                    entries.iter().map(|e| e.key_material.as_str()).collect();
                for removed in file.retain_keys(|e| wanted.contains(e.key_material.as_str())) {
                    tracing::debug!(
                        key = %removed.key_material,
                        "Removing key not in exclusive set"
                    );
                    changes.push(Change::Removed(removed.key_material));
                }
            }
        }
        KeyState::Absent => {
            for entry in &entries {
                if file.remove(&entry.key_material).is_some() {
                    tracing::debug!(key = %entry.key_material, "Removing key");
                    changes.push(Change::Removed(entry.key_material.clone()));
                }
            }
        }
    }

    Ok(changes)
}
