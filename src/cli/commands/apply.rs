//! Apply command - reconcile a user's authorized keys

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::args::ApplyArgs;
use crate::config::load_config_from_path_or_default;
use crate::reconcile::{self, Change, Outcome, Request, split_lines};
use crate::store::KeyLocation;

/// Execute the apply command
pub fn execute(args: ApplyArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from_path_or_default(config_path.as_deref())?.config;
    let types = config.key_type_set();

    let mut lines: Vec<String> = args.keys.iter().flat_map(|k| split_lines(k)).collect();
    if let Some(key_file) = &args.key_file {
        lines.extend(split_lines(&read_key_file(key_file)?));
    }

    let request = Request::new(lines, args.state)
        .with_shared_options(args.key_options.clone())
        .with_exclusive(args.exclusive);

    let manage_dir = config.manage_dir && !args.no_manage_dir;
    let follow = config.follow || args.follow;
    let location = KeyLocation::resolve(&args.user, args.path.as_deref(), manage_dir, follow)?;

    let outcome = reconcile::sync(&location, &request, &types, args.check)
        .with_context(|| format!("Failed to update '{}'", location.path().display()))?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
        _ => print_text(&outcome),
    }

    Ok(())
}

/// Read key lines from a file or from stdin for `-`
fn read_key_file(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read key lines from stdin")?;
        Ok(content)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file: {}", path.display()))
    }
}

fn print_text(outcome: &Outcome) {
    let status = match (outcome.changed, outcome.check_mode) {
        (false, _) => "unchanged",
        (true, true) => "would change",
        (true, false) => "changed",
    };
    println!("{}: {}", outcome.path.display(), status);

    for change in &outcome.changes {
        match change {
            Change::Added(key) => println!("  + {}", abbreviate(key)),
            Change::Replaced(key) => println!("  ~ {}", abbreviate(key)),
            Change::Removed(key) => println!("  - {}", abbreviate(key)),
        }
    }
}

/// Shorten key material for display
fn abbreviate(key: &str) -> String {
    const KEEP: usize = 12;
    if key.len() <= KEEP * 2 + 3 {
        return key.to_string();
    }
    match (key.get(..KEEP), key.get(key.len() - KEEP..)) {
        (Some(head), Some(tail)) => format!("{}...{}", head, tail),
        _ => key.to_string(),
    }
}
