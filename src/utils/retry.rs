// src/utils/retry.rs

//! Bounded exponential-backoff retry for fallible async operations.
//!
//! Every network call in the collector goes through here first; only after
//! the attempts are exhausted does an error reach a service's own isolation
//! logic.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Total attempts per call, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base backoff delay, doubled after each failed attempt.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Run `op` with the default attempt count and backoff.
pub async fn with_retry<T, F, Fut>(label: &str, op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    with_retry_config(label, DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY, op).await
}

/// Run `op` up to `max_attempts` times, sleeping `base_delay * 2^(n-1)`
/// after the n-th failure. The final error is propagated unchanged.
///
/// Every failure is retried identically; there is no jitter and no
/// per-error-type discrimination.
pub async fn with_retry_config<T, F, Fut>(
    label: &str,
    max_attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_attempts => {
                let delay = base_delay * 2u32.saturating_pow(attempt - 1);
                log::warn!(
                    "{}: attempt {}/{} failed: {}. Retrying in {:?}",
                    label,
                    attempt,
                    max_attempts,
                    error,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_always_failing_op_runs_exactly_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<()> =
            with_retry_config("test", 3, Duration::from_millis(1), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::fetch("test", "permanent failure"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_success_on_second_attempt_runs_twice() {
        let calls = AtomicU32::new(0);
        let result = with_retry_config("test", 3, Duration::from_millis(1), || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::fetch("test", "transient"))
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_immediate_success_runs_once() {
        let calls = AtomicU32::new(0);
        let result = with_retry_config("test", 3, Duration::from_millis(1), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("done")
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_final_error_is_propagated() {
        let result: Result<()> =
            with_retry_config("test", 2, Duration::from_millis(1), || async {
                Err(AppError::fetch("conditions", "boom"))
            })
            .await;

        match result {
            Err(AppError::Fetch { context, .. }) => assert_eq!(context, "conditions"),
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }
}
