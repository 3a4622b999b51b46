//! Application configuration settings.
//!
//! Settings share the credentials file: `[api]` and `[oauth]` are optional
//! sections next to `[secrets]`, and every field has a Box default.

use serde::{Deserialize, Serialize};
use url::Url;

/// Main configuration for bx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BxConfig {
    /// API client settings.
    pub api: ApiConfig,
    /// OAuth2 provider endpoints.
    pub oauth: OAuthConfig,
}

/// API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Box API base URL.
    #[serde(with = "url_serde")]
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://api.box.com").expect("valid default URL"),
            timeout_secs: 30,
        }
    }
}

/// OAuth2 endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Authorization URL (required by the OAuth2 client, unused by refresh).
    #[serde(with = "url_serde")]
    pub auth_url: Url,
    /// Token endpoint used for the refresh grant.
    #[serde(with = "url_serde")]
    pub token_url: Url,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            auth_url: Url::parse("https://account.box.com/api/oauth2/authorize")
                .expect("valid default URL"),
            token_url: Url::parse("https://api.box.com/oauth2/token").expect("valid default URL"),
        }
    }
}

/// Custom serde module for URL serialization.
mod url_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use url::Url;

    pub fn serialize<S>(url: &Url, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(url.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Url, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Url::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Environment variables that can override configuration.
pub mod env {
    pub const CONFIG_PATH: &str = "BX_CONFIG";
    pub const API_URL: &str = "BX_API_URL";
    pub const TOKEN_URL: &str = "BX_TOKEN_URL";
    pub const LOG_LEVEL: &str = "BX_LOG";
}

impl BxConfig {
    /// Apply environment variable overrides to the configuration.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(env::API_URL).ok().as_deref(),
            std::env::var(env::TOKEN_URL).ok().as_deref(),
        )
    }

    /// Apply endpoint overrides; unparsable URLs are ignored with a warning.
    #[must_use]
    pub fn with_overrides(mut self, api_url: Option<&str>, token_url: Option<&str>) -> Self {
        if let Some(url) = api_url {
            match Url::parse(url) {
                Ok(parsed) => self.api.base_url = parsed,
                Err(e) => tracing::warn!("Ignoring {}={url}: {e}", env::API_URL),
            }
        }

        if let Some(url) = token_url {
            match Url::parse(url) {
                Ok(parsed) => self.oauth.token_url = parsed,
                Err(e) => tracing::warn!("Ignoring {}={url}: {e}", env::TOKEN_URL),
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_box() {
        let config = BxConfig::default();
        assert_eq!(config.api.base_url.as_str(), "https://api.box.com/");
        assert_eq!(
            config.oauth.token_url.as_str(),
            "https://api.box.com/oauth2/token"
        );
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn sections_are_read_next_to_secrets() {
        let contents = r#"
[secrets]
client_id = "A"

[api]
base_url = "http://127.0.0.1:8080"

[oauth]
token_url = "http://127.0.0.1:8080/oauth2/token"
"#;
        let config: BxConfig = toml::from_str(contents).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(
            config.oauth.token_url.as_str(),
            "http://127.0.0.1:8080/oauth2/token"
        );
        assert_eq!(
            config.oauth.auth_url.as_str(),
            "https://account.box.com/api/oauth2/authorize"
        );
    }

    #[test]
    fn overrides_replace_endpoints() {
        let config = BxConfig::default()
            .with_overrides(Some("http://localhost:9000"), Some("http://localhost:9000/t"));
        assert_eq!(config.api.base_url.as_str(), "http://localhost:9000/");
        assert_eq!(config.oauth.token_url.as_str(), "http://localhost:9000/t");
    }

    #[test]
    fn invalid_override_is_ignored() {
        let config = BxConfig::default().with_overrides(Some("not a url"), None);
        assert_eq!(config.api.base_url.as_str(), "https://api.box.com/");
    }
}
