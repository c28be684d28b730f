//! Configuration loading and validation (§4.7).
//!
//! This module handles loading and validating every tunable of the matching
//! pipeline: concurrency and batching, retry/backoff policy, scoring weights
//! and thresholds, and OAuth credentials.
//!
//! The configuration system follows a hierarchical approach, generalized
//! from what `soundphilosopher-sporlcli::config` already documented for its
//! own `.env`-based setup ("environment variables (highest priority), then
//! file, then defaults") from `.env`-only to a JSON config file plus env
//! vars of the same names:
//! 1. Environment variables (highest priority)
//! 2. JSON config file (`./sporl.config.json` or `--config`/`SPORL_CONFIG_PATH`)
//! 3. Built-in defaults (always available, so the tool runs with zero setup)

use std::{env, fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "./sporl.config.json";
pub const DEFAULT_TOKEN_CACHE_PATH: &str = ".cache";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_search_limit")]
    pub spotify_search_limit: usize,
    #[serde(default = "default_max_retries")]
    pub api_max_retries: u32,
    #[serde(default = "default_base_delay")]
    pub api_retry_base_delay_seconds: f64,
    #[serde(default = "default_max_delay")]
    pub api_retry_max_delay_seconds: f64,
    #[serde(default = "default_total_timeout")]
    pub api_total_timeout_per_call_seconds: u64,
    #[serde(default = "default_title_weight")]
    pub title_weight: f64,
    #[serde(default = "default_artist_weight")]
    pub artist_weight: f64,
    #[serde(default = "default_bracket_weight")]
    pub bracket_weight: f64,
    #[serde(default = "default_keyword_bonus")]
    pub keyword_bonus: f64,
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,
    #[serde(default = "default_artist_exact_match_floor")]
    pub artist_exact_match_floor: f64,
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_token_cache_path")]
    pub token_cache_path: String,
    #[serde(default = "default_server_addr")]
    pub server_addr: String,

    #[serde(default)]
    pub spotify_client_id: Option<String>,
    #[serde(default)]
    pub spotify_client_secret: Option<String>,
    #[serde(default)]
    pub spotify_redirect_uri: Option<String>,
}

fn default_concurrency_limit() -> usize { 8 }
fn default_batch_size() -> usize { 25 }
fn default_search_limit() -> usize { 3 }
fn default_max_retries() -> u32 { 12 }
fn default_base_delay() -> f64 { 3.0 }
fn default_max_delay() -> f64 { 60.0 }
fn default_total_timeout() -> u64 { 100 }
fn default_title_weight() -> f64 { 0.7 }
fn default_artist_weight() -> f64 { 0.3 }
fn default_bracket_weight() -> f64 { 0.3 }
fn default_keyword_bonus() -> f64 { 5.0 }
fn default_match_threshold() -> f64 { 75.0 }
fn default_low_confidence_threshold() -> f64 { 60.0 }
fn default_artist_exact_match_floor() -> f64 { 80.0 }
fn default_cache_enabled() -> bool { true }
fn default_log_level() -> String { "INFO".to_string() }
fn default_token_cache_path() -> String { DEFAULT_TOKEN_CACHE_PATH.to_string() }
fn default_server_addr() -> String { "127.0.0.1:8888".to_string() }

impl Default for Config {
    fn default() -> Self {
        Config {
            concurrency_limit: default_concurrency_limit(),
            batch_size: default_batch_size(),
            spotify_search_limit: default_search_limit(),
            api_max_retries: default_max_retries(),
            api_retry_base_delay_seconds: default_base_delay(),
            api_retry_max_delay_seconds: default_max_delay(),
            api_total_timeout_per_call_seconds: default_total_timeout(),
            title_weight: default_title_weight(),
            artist_weight: default_artist_weight(),
            bracket_weight: default_bracket_weight(),
            keyword_bonus: default_keyword_bonus(),
            match_threshold: default_match_threshold(),
            low_confidence_threshold: default_low_confidence_threshold(),
            artist_exact_match_floor: default_artist_exact_match_floor(),
            cache_enabled: default_cache_enabled(),
            log_level: default_log_level(),
            token_cache_path: default_token_cache_path(),
            server_addr: default_server_addr(),
            spotify_client_id: None,
            spotify_client_secret: None,
            spotify_redirect_uri: None,
        }
    }
}

impl Config {
    /// Loads and validates the full configuration.
    ///
    /// Resolves the config file path (`path`, then `SPORL_CONFIG_PATH`, then
    /// [`DEFAULT_CONFIG_PATH`]), parses it if present, applies environment
    /// variables of the same names on top, then validates every weight and
    /// threshold. Env wins over file, file wins over built-in defaults; a
    /// missing file is not an error, since the defaults alone are a valid
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`]/[`ConfigError::Parse`] if the file
    /// exists but can't be read or isn't valid JSON, or
    /// [`ConfigError::Invalid`] if a resolved value fails validation (weights
    /// not summing to one, a threshold out of `[0, 100]`, or
    /// `LOW_CONFIDENCE_THRESHOLD` above `MATCH_THRESHOLD`).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sporl::config::Config;
    ///
    /// let config = Config::load(None).expect("config should be valid");
    /// ```
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let path = path
            .map(PathBuf::from)
            .or_else(|| env::var("SPORL_CONFIG_PATH").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                source: e,
            })?;
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                source: e,
            })?
        } else {
            Config::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        macro_rules! env_num {
            ($field:expr, $name:expr) => {
                if let Ok(v) = env::var($name) {
                    if let Ok(parsed) = v.parse() {
                        $field = parsed;
                    }
                }
            };
        }
        env_num!(self.concurrency_limit, "CONCURRENCY_LIMIT");
        env_num!(self.batch_size, "BATCH_SIZE");
        env_num!(self.spotify_search_limit, "SPOTIFY_SEARCH_LIMIT");
        env_num!(self.api_max_retries, "API_MAX_RETRIES");
        env_num!(self.api_retry_base_delay_seconds, "API_RETRY_BASE_DELAY_SECONDS");
        env_num!(self.api_retry_max_delay_seconds, "API_RETRY_MAX_DELAY_SECONDS");
        env_num!(self.api_total_timeout_per_call_seconds, "API_TOTAL_TIMEOUT_PER_CALL_SECONDS");
        env_num!(self.title_weight, "TITLE_WEIGHT");
        env_num!(self.artist_weight, "ARTIST_WEIGHT");
        env_num!(self.bracket_weight, "BRACKET_WEIGHT");
        env_num!(self.keyword_bonus, "KEYWORD_BONUS");
        env_num!(self.match_threshold, "MATCH_THRESHOLD");
        env_num!(self.low_confidence_threshold, "LOW_CONFIDENCE_THRESHOLD");
        env_num!(self.artist_exact_match_floor, "ARTIST_EXACT_MATCH_FLOOR");
        env_num!(self.cache_enabled, "CACHE_ENABLED");

        if let Ok(v) = env::var("LOG_LEVEL") {
            self.log_level = v;
        }
        if let Ok(v) = env::var("TOKEN_CACHE_PATH") {
            self.token_cache_path = v;
        }
        if let Ok(v) = env::var("SERVER_ADDR") {
            self.server_addr = v;
        }
        if let Ok(v) = env::var("SPOTIPY_CLIENT_ID") {
            self.spotify_client_id = Some(v);
        }
        if let Ok(v) = env::var("SPOTIPY_CLIENT_SECRET") {
            self.spotify_client_secret = Some(v);
        }
        if let Ok(v) = env::var("SPOTIPY_REDIRECT_URI") {
            self.spotify_redirect_uri = Some(v);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let in_range_0_100 = |field: &'static str, v: f64| -> Result<(), ConfigError> {
            if !(0.0..=100.0).contains(&v) {
                return Err(ConfigError::Invalid { field, reason: format!("{v} is not in [0, 100]") });
            }
            Ok(())
        };
        in_range_0_100("TITLE_WEIGHT", self.title_weight * 100.0)?;
        in_range_0_100("ARTIST_WEIGHT", self.artist_weight * 100.0)?;
        in_range_0_100("BRACKET_WEIGHT", self.bracket_weight * 100.0)?;
        in_range_0_100("MATCH_THRESHOLD", self.match_threshold)?;
        in_range_0_100("LOW_CONFIDENCE_THRESHOLD", self.low_confidence_threshold)?;
        in_range_0_100("ARTIST_EXACT_MATCH_FLOOR", self.artist_exact_match_floor)?;

        if self.low_confidence_threshold > self.match_threshold {
            return Err(ConfigError::Invalid {
                field: "LOW_CONFIDENCE_THRESHOLD",
                reason: "must be <= MATCH_THRESHOLD".to_string(),
            });
        }
        if (self.title_weight + self.artist_weight - 1.0).abs() > 1e-6 {
            return Err(ConfigError::Invalid {
                field: "TITLE_WEIGHT",
                reason: "TITLE_WEIGHT + ARTIST_WEIGHT must equal 1".to_string(),
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// [`ConfigError::MissingCredential`] if `SPOTIPY_CLIENT_ID` was never
    /// set via file or environment. The OAuth flow can't start without it.
    pub fn require_client_id(&self) -> Result<&str, ConfigError> {
        self.spotify_client_id
            .as_deref()
            .ok_or(ConfigError::MissingCredential("SPOTIPY_CLIENT_ID"))
    }

    /// # Errors
    ///
    /// [`ConfigError::MissingCredential`] if `SPOTIPY_CLIENT_SECRET` was
    /// never set via file or environment.
    pub fn require_client_secret(&self) -> Result<&str, ConfigError> {
        self.spotify_client_secret
            .as_deref()
            .ok_or(ConfigError::MissingCredential("SPOTIPY_CLIENT_SECRET"))
    }

    /// # Errors
    ///
    /// [`ConfigError::MissingCredential`] if `SPOTIPY_REDIRECT_URI` was
    /// never set via file or environment.
    pub fn require_redirect_uri(&self) -> Result<&str, ConfigError> {
        self.spotify_redirect_uri
            .as_deref()
            .ok_or(ConfigError::MissingCredential("SPOTIPY_REDIRECT_URI"))
    }
}

/// Initializes the global `tracing` subscriber from the resolved
/// `LOG_LEVEL`, rather than a raw `RUST_LOG` passthrough, so the same
/// env-wins precedence applies to log verbosity as to every other tunable.
///
/// Unrecognized levels fall back to `info`. Must be called once, after any
/// CLI-level `--log-level` override has already been merged into
/// `config.log_level` and before any `tracing` macro fires — the global
/// filter is fixed at init time, so a later change to `log_level` has no
/// effect.
pub fn init_logging(log_level: &str) {
    let directive = match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" => "warn",
        "ERROR" => "error",
        _ => "info",
    };
    let filter = tracing_subscriber::EnvFilter::try_new(directive)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
