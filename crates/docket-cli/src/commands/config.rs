//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use docket_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "store_file": config.store_path(),
                    "mirror_dir": config.mirror_dir(),
                    "storage_dir": config.storage_dir(),
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:    {}", config.data_dir.display());
            println!("  store_file:  {}", config.store_path().display());
            println!("  mirror_dir:  {}", config.mirror_dir().display());
            println!("  storage_dir: {}", config.storage_dir().display());
            println!(
                "  log_file:    {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(stderr)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let saved = match config_path {
        Some(path) => config.save_to_path(path),
        None => config.save(),
    };
    saved.context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one key/value pair; "" or "none" clears optional paths
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let optional = || {
        if value.is_empty() || value == "none" {
            None
        } else {
            Some(PathBuf::from(value))
        }
    };

    match key {
        "data_dir" => {
            if value.is_empty() {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = value.into();
        }
        "store_file" => config.store_file = optional(),
        "mirror_dir" => config.mirror_dir = optional(),
        "storage_dir" => config.storage_dir = optional(),
        "log_file" => config.log_file = optional(),
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, store_file, mirror_dir, storage_dir, log_file",
                key
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_paths() {
        let mut config = Config::default();

        apply(&mut config, "data_dir", "/data/docket").unwrap();
        apply(&mut config, "mirror_dir", "/data/txt").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/data/docket"));
        assert_eq!(config.mirror_dir(), PathBuf::from("/data/txt"));

        apply(&mut config, "mirror_dir", "none").unwrap();
        assert!(config.mirror_dir.is_none());
        assert_eq!(config.mirror_dir(), PathBuf::from("/data/docket/files"));
    }

    #[test]
    fn test_apply_rejects_unknown_key() {
        let mut config = Config::default();
        let err = apply(&mut config, "sync_url", "ws://x").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_apply_rejects_empty_data_dir() {
        let mut config = Config::default();
        assert!(apply(&mut config, "data_dir", "").is_err());
    }

    #[test]
    fn test_set_writes_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let output = Output::new(OutputFormat::Quiet);

        set(
            "store_file".to_string(),
            "/srv/docs.csv".to_string(),
            Some(&path),
            &output,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.store_path(), PathBuf::from("/srv/docs.csv"));
    }
}
