//! Configuration module for authkeys
//!
//! This module handles loading and validating the optional configuration
//! file. Command-line flags take precedence over values set here.

mod file;

use serde::{Deserialize, Serialize};

use crate::keys::KeyTypeSet;

pub use file::{
    ConfigFile, ConfigPath, config_search_paths, find_config_file, load_config,
    load_config_from_default_location, load_config_from_path_or_default,
};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Extra key type tokens accepted in addition to the built-in list
    #[serde(default)]
    pub key_types: Vec<String>,

    /// Create the key directory and fix its owner and mode before writing
    #[serde(default = "default_manage_dir")]
    pub manage_dir: bool,

    /// Follow a symlinked key file instead of replacing the link
    #[serde(default)]
    pub follow: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_types: Vec::new(),
            manage_dir: default_manage_dir(),
            follow: false,
        }
    }
}

fn default_manage_dir() -> bool {
    true
}

impl Config {
    /// Check values that parse but cannot be used
    pub fn validate(&self) -> crate::Result<()> {
        for key_type in &self.key_types {
            if key_type.is_empty() || key_type.chars().any(char::is_whitespace) {
                return Err(crate::Error::Config(format!(
                    "Invalid key type '{}': must be a single non-empty token",
                    key_type
                )));
            }
        }
        Ok(())
    }

    /// Key types recognized with this configuration
    pub fn key_type_set(&self) -> KeyTypeSet {
        KeyTypeSet::default().with_extra(self.key_types.iter().cloned())
    }
}
