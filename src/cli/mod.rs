//! CLI module for authkeys
//!
//! This module provides the command-line interface using clap derive macros.

pub mod args;
pub mod commands;
pub mod exit_code;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use args::{ApplyArgs, CompletionArgs, ConfigArgs, ListArgs};

/// Reconcile SSH authorized_keys files against a desired state
#[derive(Parser, Debug)]
#[command(name = "authkeys")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, global = true, env = "AUTHKEYS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add or remove keys in a user's authorized_keys file
    Apply(ApplyArgs),

    /// List the keys in a user's authorized_keys file
    List(ListArgs),

    /// Show or validate configuration
    Config(ConfigArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completion(CompletionArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::KeyState;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "authkeys",
            "apply",
            "--user",
            "alice",
            "--key",
            "ssh-rsa AAAAKEY1 a",
            "--key",
            "ssh-rsa AAAAKEY2 b",
            "--state",
            "absent",
            "--check",
        ])
        .unwrap();

        match cli.command {
            Commands::Apply(args) => {
                assert_eq!(args.user, "alice");
                assert_eq!(args.keys.len(), 2);
                assert_eq!(args.state, KeyState::Absent);
                assert!(args.check);
                assert!(!args.exclusive);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_apply_requires_keys() {
        let result = Cli::try_parse_from(["authkeys", "apply", "--user", "alice"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_state_defaults_to_present() {
        let cli =
            Cli::try_parse_from(["authkeys", "apply", "-u", "bob", "-k", "ssh-rsa K"]).unwrap();
        match cli.command {
            Commands::Apply(args) => assert_eq!(args.state, KeyState::Present),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
