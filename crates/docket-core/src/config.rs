//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/docket/config.toml, or a path given on the CLI)
//!
//! Unset paths are derived from `data_dir`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base directory for the store, mirror files and uploads
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Store file location (defaults to `<data_dir>/documents.csv`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_file: Option<PathBuf>,

    /// Mirror file directory (defaults to `<data_dir>/files`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_dir: Option<PathBuf>,

    /// Upload directory (defaults to `<data_dir>/uploads`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Log file path (logs go to stderr when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store_file: None,
            mirror_dir: None,
            storage_dir: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).context("Failed to parse config TOML")
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the default config file path
    pub fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docket")
            .join("config.toml")
    }

    /// Get the path to the store file
    pub fn store_path(&self) -> PathBuf {
        self.store_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("documents.csv"))
    }

    /// Get the mirror file directory
    pub fn mirror_dir(&self) -> PathBuf {
        self.mirror_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("files"))
    }

    /// Get the upload directory
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("uploads"))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docket")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data_dir.ends_with("docket"));
        assert!(config.store_file.is_none());
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_derived_paths() {
        let config = Config {
            data_dir: PathBuf::from("/data/docket"),
            ..Config::default()
        };

        assert_eq!(
            config.store_path(),
            PathBuf::from("/data/docket/documents.csv")
        );
        assert_eq!(config.mirror_dir(), PathBuf::from("/data/docket/files"));
        assert_eq!(config.storage_dir(), PathBuf::from("/data/docket/uploads"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = Config {
            data_dir: PathBuf::from("/data/docket"),
            store_file: Some(PathBuf::from("/elsewhere/docs.csv")),
            mirror_dir: Some(PathBuf::from("/elsewhere/txt")),
            storage_dir: Some(PathBuf::from("/elsewhere/img")),
            log_file: None,
        };

        assert_eq!(config.store_path(), PathBuf::from("/elsewhere/docs.csv"));
        assert_eq!(config.mirror_dir(), PathBuf::from("/elsewhere/txt"));
        assert_eq!(config.storage_dir(), PathBuf::from("/elsewhere/img"));
    }

    #[test]
    fn test_serialization() {
        let config = Config {
            data_dir: PathBuf::from("/data/docket"),
            store_file: None,
            mirror_dir: Some(PathBuf::from("/data/txt")),
            storage_dir: None,
            log_file: Some(PathBuf::from("/tmp/docket.log")),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("mirror_dir"));
        assert!(!toml_str.contains("store_file"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_str() {
        let toml = r#"
            data_dir = "/custom/data"
            store_file = "/custom/store.csv"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.store_path(), PathBuf::from("/custom/store.csv"));
        assert_eq!(config.mirror_dir(), PathBuf::from("/custom/data/files"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            log_file: Some(temp_dir.path().join("docket.log")),
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::load_from_str("data_dir = [").is_err());
    }
}
