//! Shared data model for the matching pipeline (spec §3).
//!
//! Names and field shapes are new; the serde-derive-everything style and the
//! `Tabled` row structs for terminal display are carried over from the
//! teacher's `types.rs`.

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// The canonical internal representation of one input line.
///
/// `title` non-empty or `artists` non-empty is enforced at parse time; a
/// line violating that invariant becomes a `ParseError` instead of a
/// `ParsedSong`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedSong {
    pub sequence: usize,
    pub original_line: String,
    pub title: String,
    pub artists: Vec<String>,
}

/// A single candidate track returned by the catalog's search endpoint,
/// before scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub uri: String,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
    pub popularity: Option<u32>,
}

/// A successful association between a `ParsedSong` and a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedSong {
    pub parsed_song: ParsedSong,
    pub catalog_id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub uri: String,
    pub album_name: Option<String>,
    pub duration_ms: Option<u64>,
    pub final_score: f64,
    pub is_low_confidence: bool,
}

/// The outcome status of matching one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Matched,
    LowConfidenceMatch,
    NotFound,
    ApiError,
    InputFormatError,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchStatus::Matched => "MATCHED",
            MatchStatus::LowConfidenceMatch => "LOW_CONFIDENCE_MATCH",
            MatchStatus::NotFound => "NOT_FOUND",
            MatchStatus::ApiError => "API_ERROR",
            MatchStatus::InputFormatError => "INPUT_FORMAT_ERROR",
        };
        f.write_str(s)
    }
}

/// The per-song outcome record, in input order once it leaves the
/// aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub sequence: usize,
    pub original_input_line: String,
    pub parsed_song_title: String,
    pub parsed_artists: Vec<String>,
    pub status: MatchStatus,
    pub matched: Option<MatchedSong>,
    pub error_message: Option<String>,
}

/// Aggregate counts returned alongside the ordered report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_input_lines: usize,
    pub matched_count: usize,
    pub low_confidence_count: usize,
    pub not_found_count: usize,
    pub api_error_count: usize,
    pub input_format_error_count: usize,
}

impl Summary {
    pub fn record(&mut self, status: MatchStatus) {
        self.total_input_lines += 1;
        match status {
            MatchStatus::Matched => self.matched_count += 1,
            MatchStatus::LowConfidenceMatch => self.low_confidence_count += 1,
            MatchStatus::NotFound => self.not_found_count += 1,
            MatchStatus::ApiError => self.api_error_count += 1,
            MatchStatus::InputFormatError => self.input_format_error_count += 1,
        }
    }

    /// True when the pipeline should report exit code 3 (report written,
    /// but some results fell short of a full `MATCHED`).
    pub fn has_partial_failure(&self) -> bool {
        self.low_confidence_count > 0
            || self.not_found_count > 0
            || self.api_error_count > 0
            || self.input_format_error_count > 0
    }
}

#[derive(Tabled)]
pub struct ReportTableRow {
    pub status: String,
    pub title: String,
    pub artists: String,
    pub score: String,
}

/// Wire shape for the catalog's playlist-create endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

/// OAuth token, persisted to the token-cache file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// In-flight PKCE exchange state, shared with the local callback server.
#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Search-result envelope shape returned by the catalog's track-search
/// endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracksResponse {
    pub tracks: SearchTracksItems,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracksItems {
    pub items: Vec<CatalogTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub artists: Vec<CatalogArtist>,
    pub album: Option<CatalogAlbum>,
    pub duration_ms: Option<u64>,
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogAlbum {
    pub name: String,
}

impl From<CatalogTrack> for Candidate {
    fn from(t: CatalogTrack) -> Self {
        Candidate {
            id: t.id,
            name: t.name,
            artists: t.artists.into_iter().map(|a| a.name).collect(),
            uri: t.uri,
            album: t.album.map(|a| a.name),
            duration_ms: t.duration_ms,
            popularity: t.popularity,
        }
    }
}
