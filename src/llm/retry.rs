//! Exponential backoff retry for provider requests.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::warn;

/// Configuration: 3 total attempts, base 1s, max 30s.
pub const MAX_ATTEMPTS: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

/// Retry an async operation with exponential backoff.
///
/// `attempt` is called up to `MAX_ATTEMPTS` times. Errors for which
/// `is_transient` returns false are returned immediately; transient ones are
/// retried after an exponentially increasing sleep. The last error is returned
/// unchanged once attempts run out.
pub async fn retry_with_backoff<T, E, Fut, F, P>(mut attempt: F, is_transient: P) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
        max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempts = 0;
    loop {
        attempts += 1;

        let err = match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if attempts >= MAX_ATTEMPTS || !is_transient(&err) {
            return Err(err);
        }

        warn!("Attempt {attempts}/{MAX_ATTEMPTS} failed: {err}. Retrying...");
        if let Some(wait_duration) = backoff.next_backoff() {
            tokio::time::sleep(wait_duration).await;
        }
    }
}
