//! Error types and result aliases for bx.
//!
//! Every failure in bx is fatal for the current run. Core code returns a
//! [`BxError`] and only `main` turns it into a process exit, so the config
//! and token logic stays testable in-process.

use std::path::PathBuf;

use thiserror::Error;

/// Where to mint a new developer token once the refresh token is dead.
pub const DEVELOPER_CONSOLE_URL: &str = "https://developer.box.com/";

/// Main error type for bx operations.
#[derive(Error, Debug)]
pub enum BxError {
    /// The config file lacks one or more required credential fields.
    #[error("bx config {} is missing these required fields:\n\t{}", .path.display(), .missing.join(", "))]
    MissingFields {
        /// Config file that was read.
        path: PathBuf,
        /// Every missing key, in lookup order.
        missing: Vec<String>,
    },

    /// The provider rejected the refresh grant.
    #[error("Authentication token has expired ({0})")]
    TokenExpired(String),

    /// API returned 401 Unauthorized and no refresh could fix it.
    #[error("API server returned unauthorized (401). Your tokens may have been revoked.")]
    Unauthorized,

    /// API returned a non-success status code.
    #[error("API request failed ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// API server is unreachable.
    #[error("API server is unavailable. Check your network connection or try again later.")]
    ApiUnavailable,

    /// Request timed out.
    #[error("Request timed out. The server may be slow or unreachable.")]
    Timeout,

    /// Network error during HTTP request.
    #[error("Network error: {0}. Check your internet connection.")]
    Network(String),

    /// General configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}. Check file permissions and format.")]
    ConfigRead(String),

    /// Failed to write configuration file.
    #[error("Failed to write configuration file: {0}. Check directory permissions.")]
    ConfigWrite(String),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("Data serialization error: {0}")]
    Serialization(String),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BxError {
    /// Checks if this error can only be fixed by minting a new token.
    #[must_use]
    pub const fn requires_reauth(&self) -> bool {
        matches!(self, Self::TokenExpired(_) | Self::Unauthorized)
    }

    /// The text `main` prints before exiting: the error, plus where to mint
    /// a new token when no refresh can help.
    #[must_use]
    pub fn fatal_report(&self) -> String {
        if self.requires_reauth() {
            format!("Fatal: {self}\n - Create a new token at: {DEVELOPER_CONSOLE_URL}")
        } else {
            format!("Fatal: {self}")
        }
    }
}

/// Result type alias using [`BxError`].
pub type Result<T> = std::result::Result<T, BxError>;

impl From<serde_json::Error> for BxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON error: {err}"))
    }
}

impl From<toml::de::Error> for BxError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigRead(format!("TOML parse error: {err}"))
    }
}

impl From<toml::ser::Error> for BxError {
    fn from(err: toml::ser::Error) -> Self {
        Self::ConfigWrite(format!("TOML serialize error: {err}"))
    }
}

impl From<reqwest::Error> for BxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ApiUnavailable
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for BxError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            // Middlewares carry our own errors through anyhow
            reqwest_middleware::Error::Middleware(inner) => match inner.downcast::<Self>() {
                Ok(bx) => bx,
                Err(other) => Self::Network(other.to_string()),
            },
            reqwest_middleware::Error::Reqwest(e) => e.into(),
        }
    }
}
