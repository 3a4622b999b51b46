//! Authentication command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::auth::{Session, TokenRefresher};
use crate::client::{BoxApiClient, User};
use crate::config::paths::resolve_dev_config_path;
use crate::config::{load_config_from, ConfigStore};
use crate::error::Result;

/// Handle `bx [CONFIG]`: refresh the stored tokens and print the user ID.
pub async fn handle_check(config: Option<PathBuf>) -> Result<()> {
    let path = resolve_dev_config_path(config)?;
    let user = check_credentials(&path).await?;

    println!("The current user ID is {}", user.id);

    Ok(())
}

/// Refresh the tokens in `path`, persist them and fetch the current user.
pub async fn check_credentials(path: &Path) -> Result<User> {
    // Step 1: Read credentials and settings
    let store = Arc::new(ConfigStore::new(path));
    tracing::info!(config = %store.path().display(), "Checking Box credentials");
    let credentials = store.parse()?;
    let settings = load_config_from(path)?;

    // Step 2: Refresh; the store is also the refresher's sink
    let refresher = Arc::new(TokenRefresher::new(settings.oauth.clone(), store.clone()));
    let tokens = refresher.authenticate(&credentials).await?;
    tracing::debug!(state = ?refresher.state(), "Refresh complete");

    // Step 3: Save explicitly as well; rewriting the same pair is a no-op
    store.update(&tokens.access_token, &tokens.refresh_token)?;

    // Step 4: Authenticate against the API with the new tokens
    let client = BoxApiClient::new(&settings.api, refresher)?;
    client
        .set_session(Session::from_refresh(&credentials, &tokens))
        .await;

    client.current_user().await
}
