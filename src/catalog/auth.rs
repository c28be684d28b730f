//! OAuth PKCE authentication against the catalog's authorization server.
//!
//! Carried over in mechanism from `soundphilosopher-sporlcli`'s
//! `spotify::auth`/`management::auth`/`server`/`api::callback`: generate a
//! PKCE verifier/challenge pair, spin up a local callback listener, open the
//! system browser at the authorize URL, and wait for the listener to capture
//! and exchange the authorization code. Generalized only where credential
//! names, the token-cache path, or the timestamp source differ from the
//! teacher (see module docs below for each).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use rand::distr::Alphanumeric;
use reqwest::Client;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};

use crate::config::Config;
use crate::error::ApiErrorKind;
use crate::types::{PkceToken, Token};

const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SCOPE: &str = "playlist-modify-public playlist-modify-private";

/// 128-character random string, per RFC 7636.
pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

/// SHA256 of `verifier`, URL-safe base64 without padding.
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Drives the full PKCE flow: opens the browser, waits for `server::serve`'s
/// `/callback` route to populate `shared_state`, and persists the resulting
/// token. `shared_state` must already be wired into a running server (the
/// caller is expected to have spawned `crate::server::serve`).
pub async fn authorize(
    config: &Config,
    shared_state: Arc<Mutex<Option<PkceToken>>>,
) -> Result<Token, ApiErrorKind> {
    let verifier = generate_code_verifier();
    let challenge = generate_code_challenge(&verifier);

    {
        let mut state = shared_state.lock().await;
        *state = Some(PkceToken { code_verifier: verifier.clone(), token: None });
    }

    let client_id = config
        .require_client_id()
        .map_err(|_| ApiErrorKind::Auth(401))?;
    let redirect_uri = config
        .require_redirect_uri()
        .map_err(|_| ApiErrorKind::Auth(401))?;

    let url = build_authorize_url(client_id, redirect_uri, &challenge);

    let _ = webbrowser::open(&url);

    wait_for_token(&shared_state).await
}

/// Assembles the authorize URL from a client id, redirect URI, and PKCE
/// challenge. Shared by `authorize` (which also opens it in a browser) and
/// `api::auth_status::auth_url` (which hands it back to an HTTP caller to
/// redirect to instead).
pub fn build_authorize_url(client_id: &str, redirect_uri: &str, challenge: &str) -> String {
    format!(
        "{AUTHORIZE_URL}?response_type=code&client_id={client_id}&scope={scope}\
         &redirect_uri={redirect_uri}&code_challenge_method=S256&code_challenge={challenge}",
        scope = urlencoding_space(SCOPE),
    )
}

/// Encodes spaces the way a query string needs them; the scope list is the
/// only value here with a character `reqwest`'s URL builder wouldn't already
/// have escaped for us, since this URL is hand-assembled rather than built
/// through `reqwest::Url`.
fn urlencoding_space(s: &str) -> String {
    s.replace(' ', "%20")
}

/// Polls `shared_state` for up to 60 seconds for the callback handler to
/// have deposited a token.
async fn wait_for_token(shared_state: &Arc<Mutex<Option<PkceToken>>>) -> Result<Token, ApiErrorKind> {
    for _ in 0..60 {
        {
            let state = shared_state.lock().await;
            if let Some(pkce) = state.as_ref() {
                if let Some(token) = &pkce.token {
                    return Ok(token.clone());
                }
            }
        }
        sleep(Duration::from_secs(1)).await;
    }
    Err(ApiErrorKind::Timeout(Duration::from_secs(60)))
}

/// Exchanges an authorization code for a token. Called by the `/callback`
/// route handler once Spotify redirects back with `code`.
pub async fn exchange_code_pkce(
    config: &Config,
    code: &str,
    verifier: &str,
) -> Result<Token, ApiErrorKind> {
    let client_id = config
        .require_client_id()
        .map_err(|_| ApiErrorKind::Auth(401))?;
    let redirect_uri = config
        .require_redirect_uri()
        .map_err(|_| ApiErrorKind::Auth(401))?;

    let client = Client::new();
    let res = client
        .post(TOKEN_URL)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await
        .map_err(|e| ApiErrorKind::TransientTransport(e.to_string()))?;

    parse_token_response(res).await
}

/// Exchanges a refresh token for a fresh access token.
pub async fn refresh_token(config: &Config, refresh_token: &str) -> Result<Token, ApiErrorKind> {
    let client_id = config
        .require_client_id()
        .map_err(|_| ApiErrorKind::Auth(401))?;

    let client = Client::new();
    let res = client
        .post(TOKEN_URL)
        .form(&[
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await
        .map_err(|e| ApiErrorKind::TransientTransport(e.to_string()))?;

    parse_token_response(res).await
}

async fn parse_token_response(res: reqwest::Response) -> Result<Token, ApiErrorKind> {
    if let Some(kind) = ApiErrorKind::from_status(res.status(), None) {
        return Err(kind);
    }
    let json: Value = res
        .json()
        .await
        .map_err(|e| ApiErrorKind::TransientTransport(e.to_string()))?;

    let access_token = json["access_token"]
        .as_str()
        .ok_or_else(|| ApiErrorKind::Permanent(0))?
        .to_string();
    // Spotify omits `refresh_token` on a refresh-grant response when the
    // original refresh token is still valid; fall back to reusing it.
    let refresh_token = json["refresh_token"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_default();
    let scope = json["scope"].as_str().unwrap_or_default().to_string();
    let expires_in = json["expires_in"].as_u64().unwrap_or(3600);

    Ok(Token { access_token, refresh_token, scope, expires_in, obtained_at: now_unix() })
}

/// Loads, refreshes, and persists an OAuth token backed by a JSON cache file.
///
/// Keeps `soundphilosopher-sporlcli::management::auth::TokenManager`'s
/// load/persist/`get_valid_token`/refresh-serialization shape, generalized
/// two ways: the cache path defaults to the literal `.cache` this crate's
/// config names (rather than a platform data directory), and timestamps come
/// from `SystemTime` rather than `chrono`, since nothing else in this crate
/// needs a calendar type.
///
/// # Cache file
///
/// The cache holds one JSON-serialized [`Token`]: access token, refresh
/// token, granted scope, and the `obtained_at`/`expires_in` pair
/// [`TokenManager::is_expired`] uses to decide when a refresh is due.
pub struct TokenManager {
    token: Token,
    cache_path: PathBuf,
}

impl TokenManager {
    /// Wraps an already-obtained token (fresh from [`authorize`] or
    /// [`exchange_code_pkce`]) for use at `cache_path`. Does not write the
    /// file; call [`TokenManager::persist`] to do that.
    pub fn new(token: Token, cache_path: impl AsRef<Path>) -> Self {
        TokenManager { token, cache_path: cache_path.as_ref().to_path_buf() }
    }

    /// Reads and parses the cached token at `cache_path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O or JSON error, stringified, if the file is
    /// missing, unreadable, or not a valid `Token`. Callers that treat "no
    /// session yet" as a distinct case (e.g. `sporl import`'s "run `sporl
    /// auth` first" message) do so by mapping this `Err` themselves.
    pub async fn load(cache_path: impl AsRef<Path>) -> Result<Self, String> {
        let cache_path = cache_path.as_ref().to_path_buf();
        let content = async_fs::read_to_string(&cache_path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { token, cache_path })
    }

    /// Writes the current token to `cache_path` as pretty-printed JSON,
    /// creating the parent directory first if it doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O or serialization error, stringified.
    pub async fn persist(&self) -> Result<(), String> {
        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await.map_err(|e| e.to_string())?;
            }
        }
        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(&self.cache_path, json).await.map_err(|e| e.to_string())
    }

    /// Returns a valid access token, refreshing and re-persisting first if
    /// the cached one is within 4 minutes of expiring. Falls back to the
    /// current (possibly stale) access token if refresh fails, so the caller
    /// can still attempt the request rather than fail before it's even sent.
    pub async fn get_valid_token(&mut self, config: &Config) -> String {
        if self.is_expired() {
            if let Ok(new_token) = refresh_token(config, &self.token.refresh_token).await {
                self.token = new_token;
                let _ = self.persist().await;
            }
        }
        self.token.access_token.clone()
    }

    /// True once within 4 minutes of `obtained_at + expires_in`, the same
    /// buffer the teacher's manager uses to refresh ahead of expiry rather
    /// than mid-request.
    fn is_expired(&self) -> bool {
        now_unix() >= self.token.obtained_at + self.token.expires_in.saturating_sub(240)
    }

    /// The token as currently cached, without checking expiry. Use
    /// [`TokenManager::get_valid_token`] instead when the token is about to
    /// be used for a request.
    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
