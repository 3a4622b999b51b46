//! Bearer token injection for Box API requests.
//!
//! The header is attached only to requests bound for the API origin, so a
//! redirect target or an absolute URL elsewhere never sees the token.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::{HeaderValue, AUTHORIZATION};
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};
use tokio::sync::RwLock;
use url::Url;

use crate::auth::Session;
use crate::error::BxError;

/// Middleware that authorizes API requests with the session's access token.
pub struct AuthMiddleware {
    session: Arc<RwLock<Option<Session>>>,
    api_base: Url,
}

impl AuthMiddleware {
    /// Authorize requests to the origin of `api_base` from `session`.
    #[must_use]
    pub fn new(session: Arc<RwLock<Option<Session>>>, api_base: Url) -> Self {
        Self { session, api_base }
    }

    fn targets_api(&self, url: &Url) -> bool {
        url.origin() == self.api_base.origin()
    }
}

fn bearer(access_token: &str) -> std::result::Result<HeaderValue, BxError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {access_token}")).map_err(|_| {
        BxError::Config("access_token contains characters not allowed in a header".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

#[async_trait]
impl Middleware for AuthMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        if !self.targets_api(req.url()) {
            tracing::debug!(url = %req.url(), "Not an API request, sending without token");
            return next.run(req, extensions).await;
        }

        // Replaces any header from an earlier attempt
        if let Some(session) = self.session.read().await.as_ref() {
            let value = bearer(&session.credentials.access_token)
                .map_err(|e| reqwest_middleware::Error::Middleware(e.into()))?;
            req.headers_mut().insert(AUTHORIZATION, value);
        }

        next.run(req, extensions).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session(access_token: &str) -> Session {
        Session::new(Credentials {
            client_id: "A".to_string(),
            client_secret: "B".to_string(),
            access_token: access_token.to_string(),
            refresh_token: "D".to_string(),
        })
    }

    fn client(api: &MockServer, session: Option<Session>) -> ClientWithMiddleware {
        ClientBuilder::new(reqwest::Client::new())
            .with(AuthMiddleware::new(
                Arc::new(RwLock::new(session)),
                api.uri().parse().unwrap(),
            ))
            .build()
    }

    #[tokio::test]
    async fn api_requests_carry_bearer_token() {
        let api = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/users/me"))
            .and(header("authorization", "Bearer C"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&api)
            .await;

        let response = client(&api, Some(session("C")))
            .get(format!("{}/2.0/users/me", api.uri()))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn other_origins_never_see_the_token() {
        let api = MockServer::start().await;
        let elsewhere = MockServer::start().await;
        Mock::given(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&elsewhere)
            .await;

        let response = client(&api, Some(session("C")))
            .get(format!("{}/download", elsewhere.uri()))
            .send()
            .await
            .unwrap();
        // Unmatched requests get wiremock's 404
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn no_session_sends_no_header() {
        let api = MockServer::start().await;
        Mock::given(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&api)
            .await;

        let response = client(&api, None)
            .get(format!("{}/2.0/users/me", api.uri()))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn unencodable_token_is_a_config_error() {
        let api = MockServer::start().await;

        let err = client(&api, Some(session("bad\ntoken")))
            .get(format!("{}/2.0/users/me", api.uri()))
            .send()
            .await
            .unwrap_err();
        assert!(matches!(BxError::from(err), BxError::Config(_)));
    }

    #[test]
    fn bearer_header_is_sensitive() {
        let value = bearer("C").unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer C");
    }
}
