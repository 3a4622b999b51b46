//! Token rotation middleware.
//!
//! Refreshes ahead of a request when the access token is known to be
//! expired, or when the API answers 401, replaying the request with the new
//! token. Each rotation goes through the [`TokenRefresher`], so the new pair
//! is persisted by its sink. A rejected refresh ends the request: the
//! refresh token is dead and another attempt would be rejected the same way.

use std::sync::Arc;

use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response, StatusCode};
use reqwest_middleware::{Middleware, Next, Result};
use tokio::sync::RwLock;

use crate::auth::{Session, TokenRefresher};
use crate::error::BxError;

/// Middleware that rotates tokens on expiry or rejection.
pub struct TokenRefreshMiddleware {
    session: Arc<RwLock<Option<Session>>>,
    refresher: Arc<TokenRefresher>,
}

impl TokenRefreshMiddleware {
    /// Create a new token refresh middleware.
    #[must_use]
    pub fn new(session: Arc<RwLock<Option<Session>>>, refresher: Arc<TokenRefresher>) -> Self {
        Self { session, refresher }
    }

    /// Refresh the session's tokens in place.
    async fn refresh_token(&self) -> std::result::Result<(), BxError> {
        let mut guard = self.session.write().await;
        let session = guard.as_mut().ok_or(BxError::Unauthorized)?;

        let tokens = self.refresher.authenticate(&session.credentials).await?;
        session.apply(&tokens);

        Ok(())
    }
}

#[async_trait]
impl Middleware for TokenRefreshMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let expired = self
            .session
            .read()
            .await
            .as_ref()
            .is_some_and(Session::is_expired);
        if expired {
            tracing::debug!("Access token expired, refreshing before request");
            self.refresh_token()
                .await
                .map_err(|e| reqwest_middleware::Error::Middleware(e.into()))?;
        }

        let replay = req.try_clone();
        let replay_next = next.clone();
        let response = next.run(req, extensions).await?;

        if response.status() != StatusCode::UNAUTHORIZED || self.session.read().await.is_none() {
            return Ok(response);
        }
        let Some(replay) = replay else {
            tracing::warn!("Received 401 Unauthorized for a request that cannot be replayed");
            return Ok(response);
        };

        tracing::warn!("Received 401 Unauthorized - refreshing access token");
        self.refresh_token()
            .await
            .map_err(|e| reqwest_middleware::Error::Middleware(e.into()))?;

        replay_next.run(replay, extensions).await
    }
}
