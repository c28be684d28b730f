use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistHttpRequest {
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub description: String,
    pub uris: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePlaylistHttpResponse {
    pub playlist_id: String,
    pub playlist_url: Option<String>,
    pub name: String,
    pub added_tracks: usize,
    pub failed_tracks: usize,
}

/// `POST /api/create-playlist`: creates a playlist and adds the posted URIs.
/// Requires a user token, extracted from shared PKCE state the same way
/// `api::callback` already does for the OAuth flow.
pub async fn create_playlist(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<CreatePlaylistHttpRequest>,
) -> Result<Json<CreatePlaylistHttpResponse>, StatusCode> {
    {
        let pkce_state = state.pkce_state.lock().await;
        pkce_state
            .as_ref()
            .and_then(|p| p.token.as_ref())
            .ok_or(StatusCode::UNAUTHORIZED)?;
    }

    let user_id = state.catalog.current_user_id().await.map_err(|_| StatusCode::BAD_GATEWAY)?;

    let created = state
        .catalog
        .create_playlist(&user_id, &req.name, &req.description, req.public)
        .await
        .map_err(|_| StatusCode::BAD_GATEWAY)?;

    let (added_tracks, failed_tracks) = match state.catalog.add_tracks(&created.id, &req.uris).await {
        Ok(added) => (added, 0),
        Err(e) => (e.added, req.uris.len() - e.added),
    };

    Ok(Json(CreatePlaylistHttpResponse {
        playlist_id: created.id,
        playlist_url: created.external_urls.and_then(|u| u.spotify),
        name: created.name,
        added_tracks,
        failed_tracks,
    }))
}
