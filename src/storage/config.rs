//! Configuration handling for tradeplug
//!
//! Configuration is read from `--config <path>` or, when not given, from
//! `config.toml` in the user's config directory (e.g.
//! `~/.config/tradeplug/config.toml`). A missing default file is not an
//! error.
//!
//! ```toml
//! data_dir = "/home/me/trade"
//! db_file = "prices.db"
//!
//! [plugins.local]
//! options = ["copy"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Per-plugin settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PluginConfig {
    /// Options applied before any given on the command line
    pub options: Vec<String>,
}

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the catalog and import files
    pub data_dir: Option<PathBuf>,

    /// Catalog filename inside the data directory
    pub db_file: String,

    /// Plugin settings keyed by plugin name
    pub plugins: BTreeMap<String, PluginConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_file: "prices.db".to_string(),
            plugins: BTreeMap::new(),
        }
    }
}

impl Config {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "tradeplug", "tradeplug")
    }

    /// Returns the user config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads configuration from `path`, or from the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()).into());
                }
                Self::load_file(path)
            }
            None => match Self::global_config_dir() {
                Some(dir) if dir.join("config.toml").is_file() => {
                    Self::load_file(&dir.join("config.toml"))
                }
                _ => Ok(Self::default()),
            },
        }
    }

    /// Loads configuration from a specific file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Data directory: explicit override, then config, then the user data dir
    pub fn data_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    /// Catalog path inside `data_dir`
    pub fn db_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.db_file)
    }

    /// Configured default options for a plugin (case-insensitive name)
    pub fn plugin_options(&self, plugin: &str) -> &[String] {
        let plugin = plugin.to_lowercase();
        self.plugins
            .iter()
            .find(|(name, _)| name.to_lowercase() == plugin)
            .map(|(_, cfg)| cfg.options.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.db_file, "prices.db");
        assert!(config.plugins.is_empty());
        assert!(config.plugin_options("local").is_empty());
    }

    #[test]
    fn parse_config() {
        let toml = r#"
data_dir = "/srv/trade"

[plugins.Local]
options = ["copy", "file=/tmp/x.prices"]
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/trade")));
        assert_eq!(config.db_file, "prices.db");
        assert_eq!(
            config.plugin_options("LOCAL"),
            &["copy".to_string(), "file=/tmp/x.prices".to_string()]
        );
    }

    #[test]
    fn data_dir_precedence() {
        let config = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };

        assert_eq!(
            config.data_dir(Some(Path::new("/from/flag"))),
            PathBuf::from("/from/flag")
        );
        assert_eq!(config.data_dir(None), PathBuf::from("/from/config"));
        assert_eq!(
            config.db_path(Path::new("/d")),
            PathBuf::from("/d/prices.db")
        );
    }

    #[test]
    fn load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "db_file = \"other.db\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.db_file, "other.db");
    }

    #[test]
    fn load_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();

        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn load_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "db_file = [").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }
}
