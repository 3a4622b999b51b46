//! Token persistence capability handed to the refresher.

use crate::config::ConfigStore;
use crate::error::Result;

/// Receives every rotated token pair.
///
/// The refresher never owns storage; it only reports rotations here.
#[cfg_attr(test, mockall::automock)]
pub trait TokenSink: Send + Sync {
    /// Persist a new access/refresh token pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the tokens cannot be written.
    fn store_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()>;
}

impl TokenSink for ConfigStore {
    fn store_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.update(access_token, refresh_token)
    }
}
