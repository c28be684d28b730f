use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::auth;
use crate::config::Config;
use crate::error::CoreError;
use crate::normalize::Normalizer;
use crate::server::{AppState, start_api_server};
use crate::types::PkceToken;
use crate::{catalog::CatalogClient, success};

/// Runs the OAuth PKCE flow standalone, for first-run setup: spins up the
/// local callback server, opens the browser, waits for the exchange to
/// complete, and persists the resulting token to the configured cache path.
pub async fn auth(config: &Config) -> Result<(), CoreError> {
    let config = Arc::new(config.clone());
    let pkce_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));

    let normalizer = Arc::new(Normalizer::new(4096));
    let placeholder_token = crate::types::Token {
        access_token: String::new(),
        refresh_token: String::new(),
        scope: String::new(),
        expires_in: 0,
        obtained_at: 0,
    };
    let catalog = Arc::new(CatalogClient::new(
        Arc::clone(&config),
        auth::TokenManager::new(placeholder_token, &config.token_cache_path),
    ));

    let state = Arc::new(AppState {
        config: Arc::clone(&config),
        normalizer,
        catalog,
        pkce_state: Arc::clone(&pkce_state),
    });

    tokio::spawn(start_api_server(state));

    let token = auth::authorize(&config, Arc::clone(&pkce_state))
        .await
        .map_err(|e| CoreError::Fatal(format!("authorization failed: {e}")))?;

    auth::TokenManager::new(token, &config.token_cache_path)
        .persist()
        .await
        .map_err(CoreError::Fatal)?;

    success!("Authenticated. Token cached at {}.", config.token_cache_path);
    Ok(())
}
