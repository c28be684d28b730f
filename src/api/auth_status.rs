use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode};
use serde::Serialize;

use crate::catalog::auth;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}

/// `GET /api/auth-status`: reports whether a token has already been
/// deposited into shared PKCE state by a completed `/callback` round trip.
pub async fn auth_status(Extension(state): Extension<Arc<AppState>>) -> Json<AuthStatusResponse> {
    let pkce_state = state.pkce_state.lock().await;
    let authenticated = pkce_state.as_ref().and_then(|p| p.token.as_ref()).is_some();
    Json(AuthStatusResponse { authenticated })
}

#[derive(Debug, Serialize)]
pub struct AuthUrlResponse {
    pub authorize_url: String,
}

/// `GET /api/auth-url`: generates a fresh PKCE verifier/challenge pair,
/// stashes the verifier in shared state for the upcoming `/callback`, and
/// returns the authorize URL a caller should redirect the user's browser to.
pub async fn auth_url(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<AuthUrlResponse>, StatusCode> {
    let verifier = auth::generate_code_verifier();
    let challenge = auth::generate_code_challenge(&verifier);

    let client_id = state.config.require_client_id().map_err(|_| StatusCode::PRECONDITION_FAILED)?;
    let redirect_uri = state.config.require_redirect_uri().map_err(|_| StatusCode::PRECONDITION_FAILED)?;
    let authorize_url = auth::build_authorize_url(client_id, redirect_uri, &challenge);

    {
        let mut pkce_state = state.pkce_state.lock().await;
        *pkce_state = Some(crate::types::PkceToken { code_verifier: verifier, token: None });
    }

    Ok(Json(AuthUrlResponse { authorize_url }))
}
