//! Argument structures for CLI commands

use clap::Args;
use clap_complete::Shell;
use std::path::PathBuf;

use crate::reconcile::KeyState;

/// Arguments for the `apply` command
#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// Account whose authorized_keys file is managed
    #[arg(short, long, env = "AUTHKEYS_USER")]
    pub user: String,

    /// Key line (repeatable)
    ///
    /// A value may hold several newline-separated key lines.
    ///
    /// Example:
    ///   -k 'ssh-rsa AAAAB3NzaC1yc2E... alice@laptop'
    #[arg(
        short,
        long = "key",
        value_name = "LINE",
        required_unless_present = "key_file"
    )]
    pub keys: Vec<String>,

    /// Read key lines from a file, `-` for stdin
    #[arg(long, value_name = "PATH")]
    pub key_file: Option<PathBuf>,

    /// Alternate path to the authorized_keys file
    #[arg(short, long)]
    pub path: Option<String>,

    /// Whether the keys should be present or absent
    #[arg(short, long, default_value = "present")]
    pub state: KeyState,

    /// Options prepended to every key line
    ///
    /// Example: --key-options 'from="10.0.0.1",no-agent-forwarding'
    #[arg(long, value_name = "OPTIONS")]
    pub key_options: Option<String>,

    /// Remove all other keys from the file
    #[arg(long)]
    pub exclusive: bool,

    /// Do not create or fix the permissions of the key directory
    #[arg(long)]
    pub no_manage_dir: bool,

    /// Follow a symlinked key file instead of replacing the link
    #[arg(long)]
    pub follow: bool,

    /// Report what would change without writing
    #[arg(long)]
    pub check: bool,

    /// Output format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

/// Arguments for the `list` command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Account whose authorized_keys file is read
    #[arg(short, long, env = "AUTHKEYS_USER")]
    pub user: String,

    /// Alternate path to the authorized_keys file
    #[arg(short, long)]
    pub path: Option<String>,

    /// Follow a symlinked key file
    #[arg(long)]
    pub follow: bool,

    /// Output format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

/// Arguments for the `config` command
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Validate configuration only
    #[arg(long)]
    pub validate: bool,

    /// Show the configuration search paths
    #[arg(long)]
    pub paths: bool,

    /// Show an example configuration
    #[arg(long)]
    pub example: bool,

    /// Output format
    #[arg(short, long, default_value = "toml", value_parser = ["toml", "json"])]
    pub format: String,
}

/// Arguments for the `completion` command
#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
