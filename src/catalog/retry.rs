//! Exponential backoff with full jitter and a total wall-clock call budget.
//!
//! The attempt loop shape is grounded in the `with_retry` helper from
//! `terry90-soulbeet`'s MusicBrainz client (per-attempt `tokio::time::timeout`,
//! non-retryable-error short-circuit). Generalized here to: add full jitter
//! to the backoff delay, honor a server `Retry-After` on 429 (as
//! `soundphilosopher-sporlcli::spotify::releases::get_release_for_artist`
//! already does), track one *total* budget across every attempt of a call
//! rather than just a per-attempt timeout, and classify failures through the
//! typed `ApiErrorKind` discriminant instead of string-matching a debug
//! representation.

use std::future::Future;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::ApiErrorKind;

/// Runs `operation` under the retry policy described by `config`. `operation`
/// returns `Ok` on success or `Err(ApiErrorKind)` classifying the failure;
/// non-retryable kinds end the loop immediately. `cancel` is checked before
/// every attempt and raced against every backoff wait, so a cancelled caller
/// never blocks on a sleep it no longer needs.
pub async fn with_retry<T, F, Fut>(
    config: &Config,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, ApiErrorKind>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiErrorKind>>,
{
    let budget = Duration::from_secs(config.api_total_timeout_per_call_seconds);
    let started = Instant::now();
    let mut last_error: Option<ApiErrorKind> = None;

    for attempt in 0..config.api_max_retries {
        if cancel.is_cancelled() {
            return Err(ApiErrorKind::Cancelled);
        }
        let elapsed = started.elapsed();
        if elapsed >= budget {
            return Err(ApiErrorKind::BudgetExceeded(budget));
        }
        let remaining = budget - elapsed;

        let result = tokio::time::timeout(remaining, operation()).await;

        match result {
            Err(_) => {
                let timeout_err = ApiErrorKind::Timeout(remaining);
                last_error = Some(timeout_err);
            }
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => {
                if !err.is_retryable() {
                    return Err(err);
                }
                let retry_after = match &err {
                    ApiErrorKind::TransientStatus { retry_after, .. } => *retry_after,
                    _ => None,
                };
                last_error = Some(err);

                if started.elapsed() >= budget {
                    break;
                }
                let delay = retry_after.unwrap_or_else(|| backoff_delay(config, attempt));
                let delay = delay.min(budget.saturating_sub(started.elapsed()));
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => return Err(ApiErrorKind::Cancelled),
                }
            }
        }
    }

    Err(ApiErrorKind::RetriesExhausted {
        attempts: config.api_max_retries,
        last: Box::new(last_error.unwrap_or(ApiErrorKind::BudgetExceeded(budget))),
    })
}

/// `delay = min(MAX_DELAY, BASE_DELAY * 2^attempt) * rand(0.5, 1.5)`.
fn backoff_delay(config: &Config, attempt: u32) -> Duration {
    let exp = config.api_retry_base_delay_seconds * 2f64.powi(attempt as i32);
    let capped = exp.min(config.api_retry_max_delay_seconds);
    let jitter = rand::rng().random_range(0.5..1.5);
    Duration::from_secs_f64((capped * jitter).max(0.0))
}
