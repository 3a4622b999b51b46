//! HTTP client for the Box API.

pub mod api;
pub mod middleware;

pub use api::{BoxApiClient, User};
