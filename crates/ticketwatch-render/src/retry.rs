//! Retry with exponential back-off and jitter for browser engine calls.
//!
//! Only failures of the engine itself are retried. Navigation timeouts and
//! malformed pages are ordinary per-target outcomes and are returned at once,
//! so a slow target never holds up the rest of the run longer than its own
//! deadline.

use std::future::Future;
use std::time::Duration;

use crate::error::RenderError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Connection failures reaching the engine.
/// - Engine responses 429, 502 and 503 (overloaded or restarting).
///
/// **Not retriable:**
/// - Any timeout; the target already had its full navigation budget.
/// - Other engine statuses, malformed responses, invalid URLs.
pub(crate) fn is_retriable(err: &RenderError) -> bool {
    match err {
        RenderError::Http(e) => e.is_connect() && !e.is_timeout(),
        RenderError::Engine { status, .. } => matches!(status, 429 | 502 | 503),
        RenderError::Timeout { .. }
        | RenderError::Deserialize { .. }
        | RenderError::Screenshot { .. }
        | RenderError::InvalidUrl { .. }
        | RenderError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt        |
/// |---------|----------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter     |
/// | 3       | 1 000 ms × 2² ± 25 % jitter     |
///
/// Delay is capped at 30 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, RenderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RenderError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "browser engine transient error; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
