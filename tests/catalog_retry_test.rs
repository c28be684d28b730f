use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use sporl::catalog::retry::with_retry;
use sporl::config::Config;
use sporl::error::ApiErrorKind;

fn fast_retry_config() -> Config {
    let mut config = Config::default();
    config.api_max_retries = 5;
    config.api_retry_base_delay_seconds = 0.01;
    config.api_retry_max_delay_seconds = 0.05;
    config.api_total_timeout_per_call_seconds = 5;
    config
}

#[tokio::test]
async fn succeeds_immediately_without_retrying() {
    let config = fast_retry_config();
    let calls = AtomicU32::new(0);

    let result: Result<u32, ApiErrorKind> = with_retry(&config, &CancellationToken::new(), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(42) }
    })
    .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn retries_transient_errors_then_succeeds() {
    let config = fast_retry_config();
    let calls = AtomicU32::new(0);

    let result: Result<u32, ApiErrorKind> = with_retry(&config, &CancellationToken::new(), || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt == 0 {
                Err(ApiErrorKind::TransientStatus { status: 503, retry_after: None })
            } else {
                Ok(7)
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), 7);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn honors_retry_after_header_as_the_sleep_duration() {
    let config = fast_retry_config();
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let result: Result<u32, ApiErrorKind> = with_retry(&config, &CancellationToken::new(), || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt == 0 {
                Err(ApiErrorKind::TransientStatus {
                    status: 429,
                    retry_after: Some(Duration::from_millis(200)),
                })
            } else {
                Ok(1)
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), 1);
    assert!(started.elapsed() >= Duration::from_millis(180));
}

#[tokio::test]
async fn permanent_errors_are_not_retried() {
    let config = fast_retry_config();
    let calls = AtomicU32::new(0);

    let result: Result<u32, ApiErrorKind> = with_retry(&config, &CancellationToken::new(), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(ApiErrorKind::Permanent(404)) }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn gives_up_after_max_retries() {
    let mut config = fast_retry_config();
    config.api_max_retries = 3;
    let calls = AtomicU32::new(0);

    let result: Result<u32, ApiErrorKind> = with_retry(&config, &CancellationToken::new(), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(ApiErrorKind::TransientStatus { status: 500, retry_after: None }) }
    })
    .await;

    assert!(matches!(result, Err(ApiErrorKind::RetriesExhausted { .. })));
    assert!(calls.load(Ordering::SeqCst) <= config.api_max_retries + 1);
}

#[tokio::test]
async fn already_cancelled_token_skips_the_call_entirely() {
    let config = fast_retry_config();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let calls = AtomicU32::new(0);

    let result: Result<u32, ApiErrorKind> = with_retry(&config, &cancel, || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(ApiErrorKind::TransientStatus { status: 503, retry_after: None }) }
    })
    .await;

    assert!(matches!(result, Err(ApiErrorKind::Cancelled)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancellation_during_backoff_wait_ends_the_call_before_the_next_attempt() {
    let mut config = fast_retry_config();
    config.api_retry_base_delay_seconds = 5.0;
    config.api_retry_max_delay_seconds = 5.0;
    config.api_total_timeout_per_call_seconds = 30;
    let cancel = CancellationToken::new();
    let calls = AtomicU32::new(0);

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel_clone.cancel();
    });

    let result: Result<u32, ApiErrorKind> = with_retry(&config, &cancel, || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(ApiErrorKind::TransientStatus { status: 503, retry_after: None }) }
    })
    .await;

    assert!(matches!(result, Err(ApiErrorKind::Cancelled)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
