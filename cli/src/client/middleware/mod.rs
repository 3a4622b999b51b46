//! HTTP client middleware.

pub mod auth;
pub mod refresh;

pub use auth::AuthMiddleware;
pub use refresh::TokenRefreshMiddleware;
