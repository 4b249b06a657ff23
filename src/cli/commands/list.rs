//! List command - show the keys in a user's authorized keys file

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::args::ListArgs;
use crate::config::load_config_from_path_or_default;
use crate::keys::KeyEntry;
use crate::store::{self, KeyLocation};

/// A key entry as shown by `list --format json`
#[derive(Debug, Serialize)]
struct ListedKey<'a> {
    key_type: &'a str,
    key: &'a str,
    comment: &'a str,
    options: Vec<String>,
}

impl<'a> From<&'a KeyEntry> for ListedKey<'a> {
    fn from(entry: &'a KeyEntry) -> Self {
        Self {
            key_type: &entry.key_type,
            key: &entry.key_material,
            comment: &entry.comment,
            options: entry
                .options
                .sorted()
                .into_iter()
                .map(|(name, value)| match value {
                    Some(v) => format!("{}=\"{}\"", name, v),
                    None => name.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    path: PathBuf,
    keys: Vec<ListedKey<'a>>,
    other_lines: usize,
}

/// Execute the list command
pub fn execute(args: ListArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from_path_or_default(config_path.as_deref())?.config;
    let types = config.key_type_set();

    // Read-only: the location is resolved but never prepared
    let follow = config.follow || args.follow;
    let location = KeyLocation::resolve(&args.user, args.path.as_deref(), false, follow)?;
    let file = store::load(location.path(), &types)
        .with_context(|| format!("Failed to list '{}'", location.path().display()))?;

    let listing = Listing {
        path: location.path().to_path_buf(),
        keys: file.keys().map(ListedKey::from).collect(),
        other_lines: file.len() - file.keys().count(),
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&listing)?),
        _ => {
            println!("# {}", listing.path.display());
            for entry in file.keys() {
                println!("{}", entry);
            }
            if listing.other_lines > 0 {
                println!("# {} other line(s) not shown", listing.other_lines);
            }
        }
    }

    Ok(())
}
