use tokio::time::{sleep, Duration};
use tracing::{error, warn};

use crate::config::settings::RetryConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySettings {
    /// total tries, first one included
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetrySettings {
    pub fn from_config(config: &RetryConfig) -> Self {
        let attempts = if config.enabled { config.max_retries.saturating_add(1) } else { 1 };
        Self {
            attempts,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    /// Run `operation` until `should_retry` rejects its outcome or attempts run out.
    ///
    /// The last outcome is returned as is, so an exhausted retryable response
    /// still reaches the caller.
    pub async fn run_with_retry<F, Fut, T, E, R>(
        &self,
        mut operation: F,
        should_retry: R,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        R: Fn(&Result<T, E>) -> bool,
        E: std::fmt::Display,
    {
        let attempts = self.attempts.max(1);
        let mut delay = self.base_delay_ms;
        let mut attempt = 1;

        loop {
            let outcome = operation().await;
            if !should_retry(&outcome) {
                return outcome;
            }
            if attempt >= attempts {
                if attempts > 1 {
                    match &outcome {
                        Err(e) => error!("all {attempt} attempts failed: {e}"),
                        Ok(_) => error!("all {attempt} attempts returned a retryable response"),
                    }
                }
                return outcome;
            }

            match &outcome {
                Err(e) => warn!("Attempt {attempt}/{attempts} failed: {e}"),
                Ok(_) => warn!("Attempt {attempt}/{attempts} returned a retryable response"),
            }
            sleep(Duration::from_millis(delay)).await;
            delay = (delay.saturating_mul(2)).min(self.max_delay_ms);
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn settings(attempts: u32) -> RetrySettings {
        RetrySettings { attempts, base_delay_ms: 1, max_delay_ms: 4 }
    }

    #[test]
    fn test_from_config() {
        let config = RetryConfig::default();
        assert_eq!(RetrySettings::from_config(&config).attempts, 11);

        let disabled = RetryConfig { enabled: false, ..RetryConfig::default() };
        assert_eq!(RetrySettings::from_config(&disabled).attempts, 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<u32, String> = settings(5)
            .run_with_retry(
                || {
                    let calls = calls.clone();
                    async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n < 2 { Err(format!("transient {n}")) } else { Ok(n) }
                    }
                },
                |outcome| outcome.is_err(),
            )
            .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_last_outcome_when_exhausted() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<u32, String> = settings(3)
            .run_with_retry(
                || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(503)
                    }
                },
                |outcome| matches!(outcome, Ok(503)),
            )
            .await;

        assert_eq!(result, Ok(503));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), String> = settings(10)
            .run_with_retry(
                || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err("fatal".to_owned())
                    }
                },
                |_| false,
            )
            .await;

        assert_eq!(result, Err("fatal".to_owned()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
