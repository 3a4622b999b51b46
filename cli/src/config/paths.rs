//! Config file locations for bx.
//!
//! bx keeps its credentials under `~/.config` on every platform, so these
//! helpers build on the home directory rather than the platform config dir.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::settings::env;
use crate::error::{BxError, Result};

const APP_DIR: &str = "bx";
const DEV_APP_DIR: &str = "bx-dev";
const CONFIG_FILE_NAME: &str = "bx.toml";

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| BxError::Config("Cannot determine home directory".to_string()))
}

/// Main config file path below a given home directory.
///
/// `<home>/.config/bx/bx.toml`
pub fn config_file_in(home: &Path) -> PathBuf {
    home.join(".config").join(APP_DIR).join(CONFIG_FILE_NAME)
}

/// Development config file path below a given home directory.
///
/// `<home>/.config/bx-dev/bx.toml`
pub fn dev_config_file_in(home: &Path) -> PathBuf {
    home.join(".config").join(DEV_APP_DIR).join(CONFIG_FILE_NAME)
}

/// Get the main configuration file path.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_file_in(&home_dir()?))
}

/// Get the development configuration file path.
pub fn dev_config_file() -> Result<PathBuf> {
    Ok(dev_config_file_in(&home_dir()?))
}

/// Resolve the config file to use.
///
/// An explicit path wins, then `BX_CONFIG`, then [`config_file`].
/// An empty `BX_CONFIG` counts as unset.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    resolve_with(explicit, std::env::var_os(env::CONFIG_PATH), config_file)
}

fn resolve_with(
    explicit: Option<PathBuf>,
    from_env: Option<OsString>,
    default: impl FnOnce() -> Result<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    match from_env {
        Some(path) if !path.is_empty() => {
            tracing::debug!(path = ?path, "Using config path from {}", env::CONFIG_PATH);
            Ok(PathBuf::from(path))
        },
        _ => default(),
    }
}

/// Resolve the config file for the smoke test, defaulting to the dev config.
pub fn resolve_dev_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit.map_or_else(dev_config_file, Ok)
}
