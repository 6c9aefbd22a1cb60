//! Bounded retry with exponential backoff for external service calls
//!
//! Request timeouts live on the provider HTTP clients; this layer retries
//! transient failures a fixed number of times and surfaces the last error.
//! Configuration and validation errors are never retried.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Retry policy for one external collaborator
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Backoff before the first retry; doubled for each further retry
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
        }
    }

    fn backoff_for(&self, retry: u32) -> Duration {
        self.initial_backoff * 2u32.saturating_pow(retry)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(500))
    }
}

/// Run `operation` under `policy`, retrying transient failures.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, what: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let backoff = policy.backoff_for(attempt);
                attempt += 1;
                tracing::warn!(
                    "{} failed (attempt {}/{}), retrying in {:?}: {}",
                    what,
                    attempt,
                    policy.max_retries + 1,
                    backoff,
                    err
                );
                tokio::time::sleep(backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let result = with_retry(&policy, "embed", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Error::embedding("connection reset"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(1));

        let result: Result<()> = with_retry(&policy, "query", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::vector_db("unavailable")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_config_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::from_millis(1));

        let result: Result<()> = with_retry(&policy, "probe", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::config("dimension mismatch")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
