//! Token types for authentication.

use chrono::{DateTime, Duration, Utc};

/// The credential set kept in the `[secrets]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth2 client ID issued by Box.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Short-lived bearer token (about one hour).
    pub access_token: String,
    /// Token used to mint new access tokens; dies after ~60 days unused.
    pub refresh_token: String,
}

impl Credentials {
    /// Replace the token pair, keeping the client credentials.
    pub fn apply(&mut self, tokens: &TokenPair) {
        self.access_token.clone_from(&tokens.access_token);
        self.refresh_token.clone_from(&tokens.refresh_token);
    }
}

/// Token pair returned by a refresh grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// The new access token.
    pub access_token: String,
    /// The new refresh token (the old one when the provider does not rotate).
    pub refresh_token: String,
    /// When the access token expires, if the provider said.
    pub expires_at: Option<DateTime<Utc>>,
}

/// In-memory credentials for the API client.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current credential set.
    pub credentials: Credentials,
    /// Access token expiry; `None` when read back from the config file.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Session for credentials of unknown age.
    #[must_use]
    pub const fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            expires_at: None,
        }
    }

    /// Session seeded from a fresh refresh grant.
    #[must_use]
    pub fn from_refresh(credentials: &Credentials, tokens: &TokenPair) -> Self {
        let mut session = Self::new(credentials.clone());
        session.apply(tokens);
        session
    }

    /// Check if the access token is expired or will expire within 5 minutes.
    ///
    /// Unknown expiry is never treated as expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|exp| exp <= Utc::now() + Duration::minutes(5))
    }

    /// Record a rotation.
    pub fn apply(&mut self, tokens: &TokenPair) {
        self.credentials.apply(tokens);
        self.expires_at = tokens.expires_at;
    }
}
