//! Catalog Client: search, playlist creation, and track addition against the
//! external music catalog (§4.3).
//!
//! Generalizes `soundphilosopher-sporlcli::spotify::{releases, artists}`'s
//! bearer-token GET pattern and `cli::playlist`'s create-then-chunk-add
//! sequence into a single authenticated client shared across workers, gated
//! by a process-wide semaphore per `CONCURRENCY_LIMIT`.

pub mod auth;
pub mod retry;

use std::sync::Arc;

use reqwest::Client;
use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{AddTracksError, ApiErrorKind};
use crate::types::{
    AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, Candidate, CreatePlaylistRequest,
    CreatePlaylistResponse, ParsedSong, SearchTracksResponse,
};

const API_BASE: &str = "https://api.spotify.com/v1";

/// Shared, authenticated handle to the catalog API. One instance is
/// constructed at startup and given to every worker behind an `Arc`; the
/// semaphore is what actually bounds in-flight requests, not the number of
/// `CatalogClient` references. `cancel` is the one cancellation signal every
/// retried call honors (§4.5); the Concurrency Coordinator trips it, but any
/// owner of the `Arc<CatalogClient>` can.
pub struct CatalogClient {
    http: Client,
    config: Arc<Config>,
    semaphore: Arc<Semaphore>,
    token: Mutex<auth::TokenManager>,
    cancel: CancellationToken,
}

impl CatalogClient {
    pub fn new(config: Arc<Config>, token_manager: auth::TokenManager) -> Self {
        let permits = config.concurrency_limit.max(1);
        CatalogClient {
            http: Client::new(),
            semaphore: Arc::new(Semaphore::new(permits)),
            token: Mutex::new(token_manager),
            cancel: CancellationToken::new(),
            config,
        }
    }

    /// Clone of the shared cancellation token. Cancelling it (via this clone
    /// or any other) stops new retry attempts and aborts in-flight backoff
    /// waits across every in-progress call on this client.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    async fn bearer_token(&self) -> String {
        let mut guard = self.token.lock().await;
        guard.get_valid_token(&self.config).await
    }

    /// Builds `track:"<title>" artist:"<a1>" artist:"<a2>"` (or just
    /// `track:"<title>"` with no artists) from the normalized title's main
    /// part plus up to the first two artists, and requests up to
    /// `SPOTIFY_SEARCH_LIMIT` candidates.
    pub async fn search(&self, main_title: &str, artists: &[String]) -> Result<Vec<Candidate>, ApiErrorKind> {
        let mut query = format!("track:\"{main_title}\"");
        for artist in artists.iter().take(2) {
            query.push_str(&format!(" artist:\"{artist}\""));
        }
        let limit = self.config.spotify_search_limit;

        let result = retry::with_retry(&self.config, &self.cancel, || async {
            let _permit = self.semaphore.acquire().await.expect("semaphore closed");
            let token = self.bearer_token().await;
            let response = self
                .http
                .get(format!("{API_BASE}/search"))
                .bearer_auth(&token)
                .query(&[("q", query.as_str()), ("type", "track"), ("limit", &limit.to_string())])
                .send()
                .await
                .map_err(map_transport_error)?;

            if let Some(kind) = ApiErrorKind::from_status(response.status(), retry_after(&response)) {
                return Err(kind);
            }
            response
                .json::<SearchTracksResponse>()
                .await
                .map_err(map_transport_error)
        })
        .await?;

        Ok(result.tracks.items.into_iter().map(Candidate::from).collect())
    }

    /// Convenience wrapper taking a `ParsedSong` directly; the matcher's
    /// normalized main title is supplied by the coordinator, not recomputed
    /// here, so this only needs the raw artist list for the query.
    pub async fn search_song(&self, main_title: &str, song: &ParsedSong) -> Result<Vec<Candidate>, ApiErrorKind> {
        self.search(main_title, &song.artists).await
    }

    /// Resolves the authenticated user's catalog id via `GET /me`, needed
    /// because playlist creation is scoped to a specific user id, not a
    /// bearer token alone.
    pub async fn current_user_id(&self) -> Result<String, ApiErrorKind> {
        #[derive(serde::Deserialize)]
        struct Me {
            id: String,
        }

        retry::with_retry(&self.config, &self.cancel, || async {
            let _permit = self.semaphore.acquire().await.expect("semaphore closed");
            let token = self.bearer_token().await;
            let response = self
                .http
                .get(format!("{API_BASE}/me"))
                .bearer_auth(&token)
                .send()
                .await
                .map_err(map_transport_error)?;

            if let Some(kind) = ApiErrorKind::from_status(response.status(), retry_after(&response)) {
                return Err(kind);
            }
            response.json::<Me>().await.map(|me| me.id).map_err(map_transport_error)
        })
        .await
    }

    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<CreatePlaylistResponse, ApiErrorKind> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
            collaborative: false,
        };

        retry::with_retry(&self.config, &self.cancel, || async {
            let _permit = self.semaphore.acquire().await.expect("semaphore closed");
            let token = self.bearer_token().await;
            let response = self
                .http
                .post(format!("{API_BASE}/users/{user_id}/playlists"))
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await
                .map_err(map_transport_error)?;

            if let Some(kind) = ApiErrorKind::from_status(response.status(), retry_after(&response)) {
                return Err(kind);
            }
            response.json::<CreatePlaylistResponse>().await.map_err(map_transport_error)
        })
        .await
    }

    /// Adds `uris` to `playlist_id`, auto-chunking into batches of at most
    /// 100 (the catalog's per-request limit) and failing fast on the first
    /// batch error, per spec. Returns the total added on success; on
    /// failure, `AddTracksError::added` carries how many URIs committed in
    /// earlier chunks before the failing one, so callers can report a
    /// truthful partial count instead of treating the whole call as atomic.
    pub async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<usize, AddTracksError> {
        let mut added = 0;
        for (chunk_index, chunk) in uris.chunks(100).enumerate() {
            let body = AddTrackToPlaylistRequest { uris: chunk.to_vec() };
            retry::with_retry(&self.config, &self.cancel, || async {
                let _permit = self.semaphore.acquire().await.expect("semaphore closed");
                let token = self.bearer_token().await;
                let response = self
                    .http
                    .post(format!("{API_BASE}/playlists/{playlist_id}/tracks"))
                    .bearer_auth(&token)
                    .json(&body)
                    .send()
                    .await
                    .map_err(map_transport_error)?;

                if let Some(kind) = ApiErrorKind::from_status(response.status(), retry_after(&response)) {
                    return Err(kind);
                }
                response
                    .json::<AddTrackToPlaylistResponse>()
                    .await
                    .map(|_| ())
                    .map_err(map_transport_error)
            })
            .await
            .map_err(|source| AddTracksError { added, offset: chunk_index * 100, source })?;
            added += chunk.len();
        }
        Ok(added)
    }
}

fn map_transport_error(e: reqwest::Error) -> ApiErrorKind {
    if e.is_timeout() {
        ApiErrorKind::Timeout(std::time::Duration::from_secs(0))
    } else {
        ApiErrorKind::TransientTransport(e.to_string())
    }
}

fn retry_after(response: &reqwest::Response) -> Option<std::time::Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(std::time::Duration::from_secs)
}
