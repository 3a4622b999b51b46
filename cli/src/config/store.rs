//! Credential storage in the bx config file.
//!
//! The `[secrets]` section of the config file holds the OAuth2 client
//! credentials and the current token pair. [`ConfigStore`] reads them all at
//! once and writes rotated tokens back in place.

use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::auth::Credentials;
use crate::config::format::read_table;
use crate::config::paths::resolve_config_path;
use crate::error::{BxError, Result};

/// Section holding the credentials.
pub const SECRETS_SECTION: &str = "secrets";

/// Keys that must be present in [`SECRETS_SECTION`], in [`Credentials`] order.
pub const REQUIRED_FIELDS: [&str; 4] = [
    "client_id",
    "client_secret",
    "access_token",
    "refresh_token",
];

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Config file backed credential store.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store for an explicit config file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store, falling back to `BX_CONFIG` and then the default
    /// config location.
    #[allow(dead_code)]
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        Ok(Self::new(resolve_config_path(path)?))
    }

    /// Path of the underlying config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the four required credential fields.
    ///
    /// # Errors
    ///
    /// Returns [`BxError::MissingFields`] naming every absent field.
    pub fn parse(&self) -> Result<Credentials> {
        let [client_id, client_secret, access_token, refresh_token]: [String; 4] = self
            .parse_fields(&REQUIRED_FIELDS)?
            .try_into()
            .map_err(|_| BxError::Config("credential field count mismatch".to_string()))?;

        Ok(Credentials {
            client_id,
            client_secret,
            access_token,
            refresh_token,
        })
    }

    /// Reads `required` keys from the secrets section, in order.
    ///
    /// A missing file reads as empty. Keys that are absent, empty, or not
    /// strings are all collected before failing, so the user sees every
    /// problem in one pass.
    pub fn parse_fields(&self, required: &[&str]) -> Result<Vec<String>> {
        let table = read_table(&self.path)?;
        let secrets = table.get(SECRETS_SECTION).and_then(Value::as_table);

        let mut values = Vec::with_capacity(required.len());
        let mut missing = Vec::new();

        for key in required {
            match secrets.and_then(|s| s.get(*key)).and_then(Value::as_str) {
                Some(value) if !value.is_empty() => values.push(value.to_string()),
                _ => missing.push((*key).to_string()),
            }
        }

        if !missing.is_empty() {
            tracing::debug!(path = %self.path.display(), ?missing, "Config is incomplete");
            return Err(BxError::MissingFields {
                path: self.path.clone(),
                missing,
            });
        }

        Ok(values)
    }

    /// Writes a new token pair back to the config file.
    ///
    /// The file is re-read and rewritten whole as TOML; other sections and
    /// keys are kept in their original order. A legacy INI file is upgraded
    /// on its first write.
    pub fn update(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        let mut table = read_table(&self.path)?;

        let section = table
            .entry(SECRETS_SECTION)
            .or_insert(Value::Table(Table::new()));
        let Value::Table(secrets) = section else {
            return Err(BxError::ConfigWrite(format!(
                "[{SECRETS_SECTION}] in {} is not a section",
                self.path.display()
            )));
        };

        secrets.insert(
            ACCESS_TOKEN_KEY.to_string(),
            Value::String(access_token.to_string()),
        );
        secrets.insert(
            REFRESH_TOKEN_KEY.to_string(),
            Value::String(refresh_token.to_string()),
        );

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(&table)?;
        fs::write(&self.path, contents)
            .map_err(|e| BxError::ConfigWrite(format!("{}: {e}", self.path.display())))?;

        tracing::debug!(path = %self.path.display(), "Saved rotated tokens");
        Ok(())
    }
}
