//! Configuration file discovery and loading
//!
//! This module provides functionality to find and load configuration files
//! from standard locations.

use std::path::{Path, PathBuf};

use super::Config;

/// Configuration file wrapper with path information
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Path where the configuration was loaded from, empty for defaults
    pub path: PathBuf,

    /// The parsed configuration
    pub config: Config,
}

/// Configuration file search path with description
#[derive(Debug, Clone)]
pub struct ConfigPath {
    /// The actual file path
    pub path: PathBuf,
    /// Human-readable description for display
    pub description: &'static str,
}

/// Standard configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application name for directory paths
const APP_NAME: &str = "authkeys";

/// Get all configuration search paths with descriptions (in priority order)
///
/// Search order:
/// 1. `$XDG_CONFIG_HOME/authkeys/config.toml` (if env var set)
/// 2. `~/.config/authkeys/config.toml`
/// 3. `/etc/authkeys/config.toml`
pub fn config_search_paths() -> Vec<ConfigPath> {
    let mut paths = Vec::new();

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        paths.push(ConfigPath {
            path: PathBuf::from(xdg).join(APP_NAME).join(CONFIG_FILE_NAME),
            description: "$XDG_CONFIG_HOME/authkeys/config.toml",
        });
    }

    if let Some(home) = dirs::home_dir() {
        let dotconfig = home.join(".config").join(APP_NAME).join(CONFIG_FILE_NAME);
        if !paths.iter().any(|p| p.path == dotconfig) {
            paths.push(ConfigPath {
                path: dotconfig,
                description: "~/.config/authkeys/config.toml",
            });
        }
    }

    paths.push(ConfigPath {
        path: PathBuf::from("/etc").join(APP_NAME).join(CONFIG_FILE_NAME),
        description: "/etc/authkeys/config.toml",
    });

    paths
}

/// Find the configuration file in standard locations
///
/// Returns `None` if no configuration file is found.
pub fn find_config_file() -> Option<PathBuf> {
    for cp in config_search_paths() {
        if cp.path.is_file() {
            tracing::debug!(path = %cp.path.display(), "Found configuration file");
            return Some(cp.path);
        }
    }

    tracing::debug!("No configuration file found in standard locations");
    None
}

/// Load and validate configuration from the specified path
pub fn load_config(path: &Path) -> crate::Result<ConfigFile> {
    tracing::debug!("Loading configuration from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::Error::Config(format!(
            "Failed to read configuration file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| {
        crate::Error::Config(format!(
            "Failed to parse configuration file '{}': {}",
            path.display(),
            e
        ))
    })?;
    config.validate()?;

    Ok(ConfigFile {
        path: path.to_path_buf(),
        config,
    })
}

/// Load configuration from the first found standard location
///
/// Returns the default configuration if no file is found.
pub fn load_config_from_default_location() -> crate::Result<ConfigFile> {
    match find_config_file() {
        Some(path) => load_config(&path),
        None => Ok(ConfigFile {
            path: PathBuf::new(),
            config: Config::default(),
        }),
    }
}

/// Load configuration from a specific path or fall back to default locations
pub fn load_config_from_path_or_default(path: Option<&Path>) -> crate::Result<ConfigFile> {
    match path {
        Some(p) => load_config(p),
        None => load_config_from_default_location(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_search_paths() {
        let paths = config_search_paths();
        assert!(!paths.is_empty());

        for cp in &paths {
            assert!(
                cp.path.is_absolute(),
                "Path should be absolute: {:?}",
                cp.path
            );
            assert!(!cp.description.is_empty());
        }

        assert_eq!(
            paths.last().unwrap().path,
            PathBuf::from("/etc/authkeys/config.toml")
        );
    }

    #[test]
    fn test_load_config_valid() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        std::fs::write(&config_path, "key_types = [\"ssh-ed25519\"]\nfollow = true\n").unwrap();

        let config_file = load_config(&config_path).unwrap();
        assert_eq!(config_file.path, config_path);
        assert_eq!(config_file.config.key_types, vec!["ssh-ed25519"]);
        assert!(config_file.config.follow);
        assert!(config_file.config.manage_dir);
    }

    #[test]
    fn test_load_config_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        std::fs::write(&config_path, "invalid toml { [ }").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_load_config_unknown_field() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        std::fs::write(&config_path, "manage_dir = true\nunknown_field = 1\n").unwrap();

        let result = load_config(&config_path);
        assert!(result.is_err(), "Should reject unknown fields");
    }

    #[test]
    fn test_load_config_semantic_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        std::fs::write(&config_path, "key_types = [\"two words\"]\n").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_load_explicit_path_wins() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        std::fs::write(&config_path, "manage_dir = false\n").unwrap();

        let config_file = load_config_from_path_or_default(Some(&config_path)).unwrap();
        assert!(!config_file.config.manage_dir);
    }
}
