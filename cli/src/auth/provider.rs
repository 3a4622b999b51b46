//! Box OAuth2 client construction.

use oauth2::basic::BasicClient;
use oauth2::{AuthType, AuthUrl, ClientId, ClientSecret, TokenUrl};

use crate::auth::tokens::Credentials;
use crate::config::settings::OAuthConfig;

/// Build an OAuth2 client for the configured endpoints.
///
/// Box expects the client credentials in the form body rather than in a
/// basic auth header.
#[must_use]
pub fn build_client(config: &OAuthConfig, credentials: &Credentials) -> BasicClient {
    BasicClient::new(
        ClientId::new(credentials.client_id.clone()),
        Some(ClientSecret::new(credentials.client_secret.clone())),
        AuthUrl::from_url(config.auth_url.clone()),
        Some(TokenUrl::from_url(config.token_url.clone())),
    )
    .set_auth_type(AuthType::RequestBody)
}
