//! Retry classification and backoff for transient scrape failures
//!
//! The sequential strategy paces every attempt with a linear, jittered
//! delay ladder (`base * (attempt + 1)` plus up to `max_jitter_secs` whole
//! seconds) and retries only errors classified as transient. Exhausting the
//! budget surfaces an explicit [`Error::RetriesExhausted`] instead of
//! silently dropping the identifier.

use crate::config::RetryConfig;
use crate::error::{Error, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (network trouble, a stale token page) should return
/// `true`. Terminal classifications (nonexistent roll number, structural
/// decode failures) should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Transport trouble is the transient case this crate exists for
            Error::Network(_) => true,
            // A form page missing its fields is usually a transient server
            // hiccup; the next GET re-reads the page
            Error::TokenNotFound(_) => true,
            // Terminal per-identifier classifications
            Error::RollNumberNotFound
            | Error::InvalidHtmlStructure(_)
            | Error::UnknownParsing
            | Error::UnknownProgramme { .. }
            | Error::NoResultPath(_)
            | Error::RetriesExhausted { .. }
            | Error::InvalidUrl(_) => false,
        }
    }
}

/// Delay before attempt `attempt` (0-based): linear ladder plus uniform
/// whole-second jitter.
fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let jitter_secs = if config.max_jitter_secs > 0 {
        rand::thread_rng().gen_range(0..=config.max_jitter_secs)
    } else {
        0
    };
    config.base_delay * (attempt + 1) + Duration::from_secs(jitter_secs)
}

/// Run `operation` under the retry budget, sleeping the backoff delay
/// before every attempt (including the first — the ladder doubles as
/// request pacing).
///
/// Non-retryable errors propagate immediately; a retryable error on the
/// final attempt becomes [`Error::RetriesExhausted`].
pub async fn fetch_with_retry<F, Fut, T>(
    config: &RetryConfig,
    roll_number: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        let delay = backoff_delay(config, attempt);
        tracing::debug!(
            roll_number,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "pacing before fetch"
        );
        tokio::time::sleep(delay).await;

        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(roll_number, attempts = attempt + 1, "fetch succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < config.max_retries => {
                attempt += 1;
                tracing::warn!(
                    roll_number,
                    error = %e,
                    attempt,
                    max_retries = config.max_retries,
                    "fetch failed, retrying"
                );
            }
            Err(e) if !e.is_retryable() => {
                tracing::debug!(roll_number, error = %e, "fetch failed with terminal error");
                return Err(e);
            }
            Err(e) => {
                tracing::error!(
                    roll_number,
                    error = %e,
                    attempts = attempt + 1,
                    "retry budget exhausted"
                );
                return Err(Error::RetriesExhausted {
                    roll_number: roll_number.to_string(),
                    attempts: attempt + 1,
                    last_error: e.to_string(),
                });
            }
        }
    }
}
