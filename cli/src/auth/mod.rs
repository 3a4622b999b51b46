//! Authentication module for bx.
//!
//! This module refreshes Box OAuth2 tokens and hands every rotated pair to a
//! [`TokenSink`] so the config file stays current.

pub mod provider;
pub mod refresh;
pub mod sink;
pub mod tokens;

pub use refresh::TokenRefresher;
pub use sink::TokenSink;
pub use tokens::{Credentials, Session, TokenPair};
