//! Bounded exponential backoff shared by the page fetcher and the store writer.
//!
//! The caller decides which errors are transient via `is_retriable`; anything
//! else is returned on the first failure. With `max_retries = 0` the operation
//! runs exactly once.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

const MAX_DELAY_MS: u64 = 60_000;

/// Executes `operation`, retrying transient failures up to `max_retries`
/// additional times.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds
/// with ±25 % jitter, capped at 60 s.
///
/// | Attempt | Sleep before next attempt (base = 1 s) |
/// |---------|----------------------------------------|
/// | 1       | ~1 s                                   |
/// | 2       | ~2 s                                   |
/// | 3       | ~4 s                                   |
///
/// # Errors
///
/// Returns the first non-retriable error, or the last error once retries are
/// exhausted.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    max_retries: u32,
    backoff_base_secs: u64,
    is_retriable: P,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                let delay_ms = backoff_delay_ms(backoff_base_secs, attempt);
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn backoff_delay_ms(backoff_base_secs: u64, attempt: u32) -> u64 {
    let computed = backoff_base_secs
        .saturating_mul(1000)
        .saturating_mul(1u64 << attempt.min(10));
    let jittered = (computed as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    jittered.min(MAX_DELAY_MS)
}
