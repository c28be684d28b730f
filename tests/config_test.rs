use std::io::Write;
use std::sync::Mutex;

use sporl::config::Config;

// Config::load reads process-wide env vars, so serialize tests that touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn defaults_are_used_when_no_file_and_no_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let config = Config::load(Some("/nonexistent/path/sporl.config.json")).expect("defaults should validate");
    assert_eq!(config.concurrency_limit, 8);
    assert_eq!(config.server_addr, "127.0.0.1:8888");
}

#[test]
fn file_values_override_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let mut file = tempfile();
    writeln!(file.as_file(), r#"{{"concurrency_limit": 16}}"#).unwrap();

    let config = Config::load(Some(file.path())).expect("should load");
    assert_eq!(config.concurrency_limit, 16);
    // untouched fields still fall back to defaults
    assert_eq!(config.batch_size, 25);
}

#[test]
fn env_vars_override_file_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let mut file = tempfile();
    writeln!(file.as_file(), r#"{{"concurrency_limit": 16}}"#).unwrap();
    unsafe { std::env::set_var("CONCURRENCY_LIMIT", "32") };

    let config = Config::load(Some(file.path())).expect("should load");
    assert_eq!(config.concurrency_limit, 32);

    clear_env();
}

#[test]
fn weights_must_sum_to_one() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let mut file = tempfile();
    writeln!(file.as_file(), r#"{{"title_weight": 0.9, "artist_weight": 0.5}}"#).unwrap();

    let result = Config::load(Some(file.path()));
    assert!(result.is_err());
}

#[test]
fn low_confidence_threshold_cannot_exceed_match_threshold() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    let mut file = tempfile();
    writeln!(file.as_file(), r#"{{"match_threshold": 50.0, "low_confidence_threshold": 60.0}}"#).unwrap();

    let result = Config::load(Some(file.path()));
    assert!(result.is_err());
}

fn clear_env() {
    for key in [
        "CONCURRENCY_LIMIT",
        "BATCH_SIZE",
        "SPOTIFY_SEARCH_LIMIT",
        "API_MAX_RETRIES",
        "API_RETRY_BASE_DELAY_SECONDS",
        "API_RETRY_MAX_DELAY_SECONDS",
        "API_TOTAL_TIMEOUT_PER_CALL_SECONDS",
        "TITLE_WEIGHT",
        "ARTIST_WEIGHT",
        "BRACKET_WEIGHT",
        "KEYWORD_BONUS",
        "MATCH_THRESHOLD",
        "LOW_CONFIDENCE_THRESHOLD",
        "ARTIST_EXACT_MATCH_FLOOR",
        "CACHE_ENABLED",
        "LOG_LEVEL",
        "TOKEN_CACHE_PATH",
        "SERVER_ADDR",
        "SPOTIPY_CLIENT_ID",
        "SPOTIPY_CLIENT_SECRET",
        "SPOTIPY_REDIRECT_URI",
    ] {
        unsafe { std::env::remove_var(key) };
    }
}

struct TempFile {
    path: std::path::PathBuf,
    file: std::fs::File,
}

impl TempFile {
    fn as_file(&mut self) -> &mut std::fs::File {
        &mut self.file
    }

    fn path(&self) -> &str {
        self.path.to_str().unwrap()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn tempfile() -> TempFile {
    static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let mut path = std::env::temp_dir();
    path.push(format!("sporl-config-test-{}-{n}.json", std::process::id()));
    let file = std::fs::File::create(&path).unwrap();
    TempFile { path, file }
}
