//! Box API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::Deserialize;
use tokio::sync::RwLock;
use url::Url;

use crate::auth::{Session, TokenRefresher};
use crate::client::middleware::{AuthMiddleware, TokenRefreshMiddleware};
use crate::config::ApiConfig;
use crate::error::{BxError, Result};

/// The authenticated Box user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// Box user ID.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Login email.
    pub login: Option<String>,
}

/// API client for the Box content API.
pub struct BoxApiClient {
    client: ClientWithMiddleware,
    base_url: Url,
    session: Arc<RwLock<Option<Session>>>,
}

impl BoxApiClient {
    /// Create a new API client.
    ///
    /// Token rotations triggered by API responses go through `refresher`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, refresher: Arc<TokenRefresher>) -> Result<Self> {
        let inner_client = Client::builder()
            .user_agent(format!("bx/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let session: Arc<RwLock<Option<Session>>> = Arc::new(RwLock::new(None));

        // Rotation wraps auth so a replayed request picks up the new token
        let client = ClientBuilder::new(inner_client)
            .with(TokenRefreshMiddleware::new(Arc::clone(&session), refresher))
            .with(AuthMiddleware::new(
                Arc::clone(&session),
                config.base_url.clone(),
            ))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            session,
        })
    }

    /// Set the session used to authorize requests.
    pub async fn set_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    /// Current session, including any rotation made by the middleware.
    #[allow(dead_code)]
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Get the user the current tokens belong to.
    ///
    /// # Errors
    ///
    /// Returns [`BxError::Unauthorized`] on a 401 that survived a refresh,
    /// [`BxError::TokenExpired`] if that refresh was rejected, or
    /// [`BxError::ApiError`] for any other failure status.
    pub async fn current_user(&self) -> Result<User> {
        let url = self.base_url.join("/2.0/users/me")?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BxError::Unauthorized);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BxError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let user: User = response
            .json()
            .await
            .map_err(|e| BxError::Serialization(e.to_string()))?;

        tracing::debug!(user_id = %user.id, name = ?user.name, login = ?user.login, "Fetched current user");
        Ok(user)
    }
}
