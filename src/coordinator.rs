//! Concurrency Coordinator (§4.5): bounded worker pool driving
//! Search → Match → Result for every parsed song.
//!
//! Generalizes `soundphilosopher-sporlcli::cli::playlist::playlist`'s
//! spawn-per-chunk-then-`JoinHandle::await`-all pattern into a steady-state
//! pool of `CONCURRENCY_LIMIT` workers reading from one shared bounded
//! channel, since the input here is a stream of individually-sized songs
//! rather than a handful of fixed-size chunks.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::error::ApiErrorKind;
use crate::matcher;
use crate::normalize::Normalizer;
use crate::parser::ParseOutcome;
use crate::types::{MatchResult, MatchStatus, ParsedSong};

/// Drains `outcomes` into the pool, runs every `ParsedSong` through
/// Search → Match → Result across `config.concurrency_limit` workers, and
/// returns the unordered `MatchResult`s (the aggregator restores order via
/// each result's `sequence`).
pub async fn run(
    config: Arc<Config>,
    normalizer: Arc<Normalizer>,
    catalog: Arc<CatalogClient>,
    outcomes: Vec<ParseOutcome>,
) -> Vec<MatchResult> {
    let mut results = Vec::with_capacity(outcomes.len());

    let mut songs = Vec::new();
    for outcome in outcomes {
        match outcome {
            ParseOutcome::Song(song) => songs.push(song),
            ParseOutcome::Error(err) => results.push(MatchResult {
                sequence: err.sequence,
                original_input_line: err.original_line.clone(),
                parsed_song_title: String::new(),
                parsed_artists: Vec::new(),
                status: MatchStatus::InputFormatError,
                matched: None,
                error_message: Some(format!("line {}: {}", err.line_number, err.reason)),
            }),
        }
    }

    let cancel = catalog.cancellation();

    let queue_capacity = (config.batch_size * 2).max(1);
    let (tx, rx) = mpsc::channel::<ParsedSong>(queue_capacity);
    let rx = Arc::new(tokio::sync::Mutex::new(rx));

    let mut workers = JoinSet::new();
    for _ in 0..config.concurrency_limit.max(1) {
        let rx = Arc::clone(&rx);
        let normalizer = Arc::clone(&normalizer);
        let catalog = Arc::clone(&catalog);
        let config = Arc::clone(&config);
        let cancel = cancel.clone();
        workers.spawn(async move {
            let mut out = Vec::new();
            loop {
                if cancel.is_cancelled() {
                    break;
                }
                let song = {
                    let mut guard = rx.lock().await;
                    tokio::select! {
                        song = guard.recv() => song,
                        _ = cancel.cancelled() => None,
                    }
                };
                let Some(song) = song else { break };
                out.push(process_song(&config, &normalizer, &catalog, song).await);
            }
            out
        });
    }

    for song in songs {
        if cancel.is_cancelled() {
            break;
        }
        tokio::select! {
            result = tx.send(song) => if result.is_err() { break },
            _ = cancel.cancelled() => break,
        }
    }
    drop(tx);

    while let Some(joined) = workers.join_next().await {
        if let Ok(partial) = joined {
            results.extend(partial);
        }
    }

    results
}

async fn process_song(
    config: &Config,
    normalizer: &Normalizer,
    catalog: &CatalogClient,
    song: ParsedSong,
) -> MatchResult {
    let normalized_title = normalizer.normalize(&song.title, Default::default());
    let (main_title, _groups) = normalizer.split_main_and_bracketed(&normalized_title);

    let search_result = tokio::time::timeout(
        std::time::Duration::from_secs(config.api_total_timeout_per_call_seconds),
        catalog.search(&main_title, &song.artists),
    )
    .await;

    let candidates = match search_result {
        Err(_) => {
            return api_error_result(&song, "timeout".to_string());
        }
        Ok(Err(err)) => {
            return api_error_result(&song, describe_api_error(&err));
        }
        Ok(Ok(candidates)) => candidates,
    };

    match matcher::best_match(normalizer, config, &song, &candidates) {
        Some(matched) => MatchResult {
            sequence: song.sequence,
            original_input_line: song.original_line.clone(),
            parsed_song_title: song.title.clone(),
            parsed_artists: song.artists.clone(),
            status: if matched.is_low_confidence {
                MatchStatus::LowConfidenceMatch
            } else {
                MatchStatus::Matched
            },
            matched: Some(matched),
            error_message: None,
        },
        None => MatchResult {
            sequence: song.sequence,
            original_input_line: song.original_line.clone(),
            parsed_song_title: song.title.clone(),
            parsed_artists: song.artists.clone(),
            status: MatchStatus::NotFound,
            matched: None,
            error_message: None,
        },
    }
}

fn api_error_result(song: &ParsedSong, message: String) -> MatchResult {
    MatchResult {
        sequence: song.sequence,
        original_input_line: song.original_line.clone(),
        parsed_song_title: song.title.clone(),
        parsed_artists: song.artists.clone(),
        status: MatchStatus::ApiError,
        matched: None,
        error_message: Some(message),
    }
}

fn describe_api_error(err: &ApiErrorKind) -> String {
    err.to_string()
}
