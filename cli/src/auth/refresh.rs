//! OAuth2 refresh grant.
//!
//! [`TokenRefresher`] trades the stored refresh token for a new token pair
//! and reports the rotation to its [`TokenSink`]. A rejected refresh is not
//! retried: once the refresh token is past the provider's window only a new
//! developer token helps.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use oauth2::reqwest::async_http_client;
use oauth2::{ErrorResponse, RefreshToken, RequestTokenError, TokenResponse};

use crate::auth::provider::build_client;
use crate::auth::{Credentials, TokenPair, TokenSink};
use crate::config::settings::OAuthConfig;
use crate::error::{BxError, Result};

/// Where the refresher stands after its last attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No refresh has completed yet.
    #[default]
    Unauthenticated,
    /// The last refresh succeeded.
    Authenticated,
    /// The provider rejected the refresh.
    Failed,
}

/// Performs refresh grants and persists every rotation.
pub struct TokenRefresher {
    oauth: OAuthConfig,
    sink: Arc<dyn TokenSink>,
    state: Mutex<AuthState>,
}

impl TokenRefresher {
    /// Create a refresher that reports rotations to `sink`.
    pub fn new(oauth: OAuthConfig, sink: Arc<dyn TokenSink>) -> Self {
        Self {
            oauth,
            sink,
            state: Mutex::new(AuthState::Unauthenticated),
        }
    }

    /// Current authentication state.
    pub fn state(&self) -> AuthState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: AuthState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Exchange the refresh token in `credentials` for a new token pair.
    ///
    /// On success the sink is called exactly once with the new pair before
    /// it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`BxError::TokenExpired`] if the provider rejects the grant or
    /// cannot be reached; the sink is not called in that case.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<TokenPair> {
        let client = build_client(&self.oauth, credentials);
        tracing::debug!(token_url = %self.oauth.token_url, "Refreshing access token");

        let response = match client
            .exchange_refresh_token(&RefreshToken::new(credentials.refresh_token.clone()))
            .request_async(async_http_client)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let details = describe(&e);
                tracing::error!("Token refresh failed: {details}");
                self.set_state(AuthState::Failed);
                return Err(BxError::TokenExpired(details));
            },
        };

        let expires_at = response.expires_in().and_then(expiry_from_now);

        let tokens = TokenPair {
            access_token: response.access_token().secret().clone(),
            refresh_token: response.refresh_token().map_or_else(
                || credentials.refresh_token.clone(),
                |token| token.secret().clone(),
            ),
            expires_at,
        };

        self.sink
            .store_tokens(&tokens.access_token, &tokens.refresh_token)?;
        self.set_state(AuthState::Authenticated);

        tracing::info!(rotated = response.refresh_token().is_some(), "Access token refreshed");
        Ok(tokens)
    }
}

/// Absolute expiry for an `expires_in` lifetime.
///
/// Lifetimes past chrono's range give `None`, the same as a provider that
/// sent no `expires_in`.
fn expiry_from_now(lifetime: std::time::Duration) -> Option<DateTime<Utc>> {
    let lifetime = chrono::Duration::from_std(lifetime).ok()?;
    Utc::now().checked_add_signed(lifetime)
}

fn describe<RE, T>(err: &RequestTokenError<RE, T>) -> String
where
    RE: std::error::Error + 'static,
    T: ErrorResponse + fmt::Display + 'static,
{
    match err {
        RequestTokenError::ServerResponse(response) => response.to_string(),
        RequestTokenError::Request(e) => format!("request failed: {e}"),
        RequestTokenError::Parse(e, _) => format!("unexpected token response: {e}"),
        RequestTokenError::Other(message) => message.clone(),
    }
}
