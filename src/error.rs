//! Typed error taxonomy for the matching pipeline.
//!
//! Generalizes the ad hoc `Result<_, String>` / `Box<dyn Error>` types the
//! teacher codebase used (`management::state::StateError`,
//! `management::release::ReleaseError`, the bare strings in `config.rs`)
//! into the discriminated `ErrorKind` design note calls for: the retry loop
//! in `catalog::retry` inspects `ApiErrorKind`'s variant, never a string
//! matched out of a debug representation.

use std::time::Duration;

use thiserror::Error;

/// Startup configuration failures. Always fatal; the CLI maps this to exit
/// code 1.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing required credential: {0}")]
    MissingCredential(&'static str),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Why a single input line failed to parse. Never fatal to the stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line_number}: {reason}")]
pub struct ParseError {
    /// 0-based position among surviving (non-blank) lines, shared with
    /// `ParsedSong::sequence` so the aggregator can restore input order
    /// across both outcome kinds.
    pub sequence: usize,
    pub line_number: usize,
    pub original_line: String,
    pub reason: String,
}

/// Why an outbound catalog call did not produce a usable response.
/// `Transient` variants are retried by `catalog::retry`; `Permanent` and
/// `Auth` end the attempt loop immediately.
#[derive(Debug, Error, Clone)]
pub enum ApiErrorKind {
    #[error("transient HTTP status {status}")]
    TransientStatus { status: u16, retry_after: Option<Duration> },
    #[error("transient transport error: {0}")]
    TransientTransport(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("permanent HTTP status {0}")]
    Permanent(u16),
    #[error("authorization failed with status {0}")]
    Auth(u16),
    #[error("exhausted {attempts} attempts, last error: {last}")]
    RetriesExhausted { attempts: u32, last: Box<ApiErrorKind> },
    #[error("exceeded total call budget of {0:?}")]
    BudgetExceeded(Duration),
    #[error("cancelled")]
    Cancelled,
}

impl ApiErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiErrorKind::TransientStatus { .. }
                | ApiErrorKind::TransientTransport(_)
                | ApiErrorKind::Timeout(_)
        )
    }

    /// Classifies a completed HTTP response's status code.
    pub fn from_status(status: reqwest::StatusCode, retry_after: Option<Duration>) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        let code = status.as_u16();
        Some(match code {
            401 | 403 => ApiErrorKind::Auth(code),
            429 | 500 | 502 | 503 | 504 => ApiErrorKind::TransientStatus { status: code, retry_after },
            _ => ApiErrorKind::Permanent(code),
        })
    }
}

/// Raised by `CatalogClient::add_tracks` when a chunk fails after one or
/// more earlier chunks already committed. `added` is how many URIs were
/// confirmed added before the failure, not `0` or "all of them" — the
/// caller needs that count to report a truthful partial result.
#[derive(Debug, Error)]
#[error("add-tracks batch starting at offset {offset} failed: {source}")]
pub struct AddTracksError {
    pub added: usize,
    pub offset: usize,
    #[source]
    pub source: ApiErrorKind,
}

/// Playlist-mutation failures. These occur after matching is complete and
/// never retroactively change a `MatchResult`.
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("failed to create playlist {name:?}: {source}")]
    Creation { name: String, #[source] source: ApiErrorKind },
    #[error(transparent)]
    AddTracks(#[from] AddTracksError),
}

/// Top-level error the CLI matches on to choose an exit code.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("input error: {0}")]
    Input(String),
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
    #[error("fatal runtime error: {0}")]
    Fatal(String),
}

impl CoreError {
    /// Exit codes per the CLI contract: 0 success, 1 configuration/auth
    /// error, 2 input error, 3 partial failure, 4 fatal runtime error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::Config(_) => 1,
            CoreError::Input(_) => 2,
            CoreError::Playlist(_) => 4,
            CoreError::Fatal(_) => 4,
        }
    }
}
