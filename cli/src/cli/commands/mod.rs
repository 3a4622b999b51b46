//! Command implementations.

pub mod auth;

pub use auth::handle_check;
