//! Config command - show or validate configuration

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{Config, config_search_paths, find_config_file, load_config};
use crate::keys::DEFAULT_KEY_TYPES;

/// Example configuration content
fn example_config() -> &'static str {
    r#"# authkeys configuration file

# Key types accepted in addition to the built-in list
# (ecdsa-sha2-nistp256, ecdsa-sha2-nistp384, ecdsa-sha2-nistp521, ssh-dss, ssh-rsa)
# key_types = ["ssh-ed25519", "sk-ssh-ed25519@openssh.com"]

# Create ~/.ssh with mode 0700 and fix its owner before writing
# Default: true
manage_dir = true

# Write through a symlinked authorized_keys file instead of replacing the link
# Default: false
follow = false
"#
}

/// Execute the config command
pub fn execute(args: ConfigArgs, config_path: Option<PathBuf>) -> Result<()> {
    if args.paths {
        println!("Config search paths (in priority order):");
        for (i, cp) in config_search_paths().iter().enumerate() {
            let exists = if cp.path.exists() { "[exists]" } else { "" };
            println!("  {}. {} {}", i + 1, cp.description, exists);
            println!("     {}", cp.path.display());
        }
        return Ok(());
    }

    if args.example {
        match args.format.as_str() {
            "json" => {
                let config: Config =
                    toml::from_str(example_config()).context("Failed to parse example config")?;
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            _ => print!("{}", example_config()),
        }
        return Ok(());
    }

    let path = config_path.or_else(find_config_file);

    match path {
        Some(path) if args.validate => {
            load_config(&path)?;
            println!("Configuration file is valid: {}", path.display());
        }
        Some(path) => show(&path, &args.format)?,
        None if args.validate => {
            let searched: Vec<String> = config_search_paths()
                .iter()
                .map(|cp| cp.path.display().to_string())
                .collect();
            bail!(
                "No configuration file found (searched: {})",
                searched.join(", ")
            );
        }
        None => {
            println!("# No configuration file found, using defaults");
            println!("# Use 'config --paths' to see search locations");
            println!();
            print!("{}", toml::to_string_pretty(&Config::default())?);
        }
    }

    Ok(())
}

/// Print the effective configuration loaded from `path`
fn show(path: &Path, format: &str) -> Result<()> {
    let config = load_config(path)?.config;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&config)?),
        _ => {
            println!("# Configuration from: {}", path.display());
            println!();
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    println!();
    println!("# Recognized key types:");
    let types = config.key_type_set();
    for key_type in types.iter() {
        let origin = if DEFAULT_KEY_TYPES.contains(&key_type) {
            "built-in"
        } else {
            "configured"
        };
        println!("#   {} ({})", key_type, origin);
    }

    Ok(())
}
