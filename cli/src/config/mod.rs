//! Configuration management for bx.
//!
//! One TOML file holds both the credentials (`[secrets]`, see
//! [`ConfigStore`]) and the optional endpoint settings (`[api]`, `[oauth]`).
//! Legacy INI files are still read, see [`format`].

pub mod format;
pub mod paths;
pub mod settings;
pub mod store;

pub use settings::{ApiConfig, BxConfig};
pub use store::ConfigStore;

use std::path::Path;

use crate::error::{BxError, Result};

/// Load settings from a specific path.
///
/// If the file doesn't exist, returns default configuration.
pub fn load_config_from(path: &Path) -> Result<BxConfig> {
    if !path.exists() {
        return Ok(BxConfig::default().with_env_overrides());
    }

    let table = format::read_table(path)?;
    let config: BxConfig = toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| BxError::ConfigRead(e.to_string()))?;

    Ok(config.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn settings_ignore_secrets_section() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bx.toml");
        std::fs::write(
            &path,
            "[secrets]\nclient_id = \"A\"\n\n[api]\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    fn malformed_settings_are_a_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bx.toml");
        std::fs::write(&path, "[api]\nbase_url = \"not a url\"\n").unwrap();

        assert!(matches!(load_config_from(&path), Err(BxError::ConfigRead(_))));
    }

    #[test]
    fn legacy_ini_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bx.toml");
        std::fs::write(&path, "[secrets]\nclient_id = XXXX\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
    }
}
