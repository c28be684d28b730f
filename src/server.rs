use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tokio::sync::Mutex;

use crate::{
    api,
    catalog::CatalogClient,
    config::Config,
    error,
    normalize::Normalizer,
    types::PkceToken,
};

/// Shared state handed to every HTTP handler via `Extension<Arc<AppState>>`.
/// Bundles the pieces the CLI path already owns (config, normalizer, catalog
/// client) plus the PKCE state the OAuth callback flow reads and writes.
pub struct AppState {
    pub config: Arc<Config>,
    pub normalizer: Arc<Normalizer>,
    pub catalog: Arc<CatalogClient>,
    pub pkce_state: Arc<Mutex<Option<PkceToken>>>,
}

/// Starts the API server: OAuth callback/health on the root path, plus the
/// song-processing and playlist endpoints under `/api`.
///
/// The server runs indefinitely and binds to `config.server_addr`.
///
/// # Panics
///
/// Panics if the configured address cannot be parsed or bound.
pub async fn start_api_server(state: Arc<AppState>) {
    let addr = match SocketAddr::from_str(&state.config.server_addr) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .route("/api/process-songs", post(api::process_songs))
        .route("/api/create-playlist", post(api::create_playlist))
        .route("/api/auth-status", get(api::auth_status))
        .route("/api/auth-url", get(api::auth_url))
        .layer(Extension(Arc::clone(&state.config)))
        .layer(Extension(Arc::clone(&state.pkce_state)))
        .layer(Extension(state));

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
