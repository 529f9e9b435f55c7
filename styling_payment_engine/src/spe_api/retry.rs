//! Bounded retries with exponential backoff for storage calls.
use std::{fmt::Display, future::Future, time::Duration};

use log::*;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// With the defaults, an operation is tried 4 times, sleeping 1s, 2s and 4s between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES, base_delay: DEFAULT_BASE_DELAY }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// The delay before retry number `retry` (zero-based): `base * 2^retry`.
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }

    /// Runs `op` until it succeeds or the retries are used up, in which case the last error is returned.
    ///
    /// The delay between attempts is an async sleep, so other requests keep being served while this one waits.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => {
                    if retry > 0 {
                        info!("🔁️ {label} succeeded on attempt {}", retry + 1);
                    }
                    return Ok(value);
                },
                Err(e) if retry < self.max_retries => {
                    let delay = self.delay_before_retry(retry);
                    warn!(
                        "🔁️ {label} failed on attempt {} of {}. Retrying in {}ms. {e}",
                        retry + 1,
                        self.total_attempts(),
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                },
                Err(e) => {
                    error!("🔁️ {label} failed after {} attempts. Giving up. {e}", self.total_attempts());
                    return Err(e);
                },
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn default_backoff_doubles_from_one_second() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.total_attempts(), 4);
        let delays = (0..policy.max_retries()).map(|r| policy.delay_before_retry(r)).collect::<Vec<_>>();
        assert_eq!(delays, vec![Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(4)]);
    }

    #[tokio::test]
    async fn succeeds_on_the_last_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = policy
            .run("flaky op", || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 3 {
                    Err(format!("failure {n}"))
                } else {
                    Ok(n)
                }
            })
            .await;
        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn returns_the_last_error_when_exhausted() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = policy
            .run("broken op", || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Err(format!("failure {n}"))
            })
            .await;
        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let policy = RetryPolicy::new(0, Duration::from_secs(60));
        let calls = AtomicU32::new(0);
        let result: Result<(), &str> = policy
            .run("single shot", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("nope")
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
