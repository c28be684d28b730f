use std::sync::Arc;

use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::server::AppState;
use crate::types::MatchedSong;
use crate::{aggregator, coordinator, parser};

#[derive(Debug, Deserialize)]
pub struct ProcessSongsRequest {
    pub song_list: String,
    pub concurrency: Option<usize>,
    pub batch_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ProcessSongsResponse {
    pub total_songs: usize,
    pub matched_songs: Vec<MatchedSong>,
    pub unmatched_songs: Vec<String>,
}

/// `POST /api/process-songs`: runs Input Parser → Coordinator → Aggregator
/// over the posted song list using project-level credentials (no user token
/// needed, since searching the catalog doesn't mutate anything on a user's
/// behalf).
pub async fn process_songs(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<ProcessSongsRequest>,
) -> Json<ProcessSongsResponse> {
    let mut config = (*state.config).clone();
    if let Some(concurrency) = req.concurrency {
        config.concurrency_limit = concurrency;
    }
    if let Some(batch_size) = req.batch_size {
        config.batch_size = batch_size;
    }
    let config = Arc::new(config);

    let outcomes = parser::parse_lines(&req.song_list);
    let results = coordinator::run(
        Arc::clone(&config),
        Arc::clone(&state.normalizer),
        Arc::clone(&state.catalog),
        outcomes,
    )
    .await;
    let (results, _summary) = aggregator::aggregate(results);

    let total_songs = results.len();
    let mut matched_songs = Vec::new();
    let mut unmatched_songs = Vec::new();
    for result in results {
        match result.matched {
            Some(matched) => matched_songs.push(matched),
            None => unmatched_songs.push(result.original_input_line),
        }
    }

    Json(ProcessSongsResponse { total_songs, matched_songs, unmatched_songs })
}
