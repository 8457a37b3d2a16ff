//! Retry policy for transient catalog failures.
//!
//! The default policy retries timeouts forever with no delay between
//! attempts. Rate-limited requests always wait at least `rate_limit_wait`
//! before the next attempt. Set `max_retries` to bound the number of retries.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::CatalogError;

/// Minimum wait before retrying a rate-limited request.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(1);

/// How transient failures are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt (`None` = unbounded).
    pub max_retries: Option<u32>,
    /// Delay before each retry.
    pub backoff: Duration,
    /// Minimum delay before retrying after [`CatalogError::RateLimitExceeded`].
    pub rate_limit_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl RetryPolicy {
    /// Retry forever, immediately after a timeout.
    pub fn unbounded() -> Self {
        Self {
            max_retries: None,
            backoff: Duration::ZERO,
            rate_limit_wait: DEFAULT_RATE_LIMIT_WAIT,
        }
    }

    /// Cap the number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sleep for `backoff` before every retry.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Wait at least `wait` before retrying a rate-limited request.
    pub fn with_rate_limit_wait(mut self, wait: Duration) -> Self {
        self.rate_limit_wait = wait;
        self
    }

    /// Delay before retrying after `err`.
    pub fn delay_for(&self, err: &CatalogError) -> Duration {
        match err {
            CatalogError::RateLimitExceeded => self.backoff.max(self.rate_limit_wait),
            _ => self.backoff,
        }
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out.
    ///
    /// Only [`CatalogError::is_transient`] errors are retried. When `stop` is
    /// given and becomes `true`, the last transient error is returned instead
    /// of retrying again.
    pub async fn run<T, F, Fut>(
        &self,
        label: &str,
        stop: Option<&AtomicBool>,
        mut op: F,
    ) -> Result<T, CatalogError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        let mut retries: u32 = 0;

        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() => e,
                Err(e) => return Err(e),
            };

            if self.max_retries.is_some_and(|max| retries >= max) {
                warn!("Giving up on {} after {} retries: {}", label, retries, err);
                return Err(err);
            }

            if stop.is_some_and(|s| s.load(Ordering::SeqCst)) {
                warn!("Not retrying {} past the deadline: {}", label, err);
                return Err(err);
            }

            retries += 1;
            info!("{} for {}, retrying (attempt {})...", err, label, retries + 1);

            let delay = self.delay_for(&err);
            if !delay.is_zero() {
                debug!("Waiting {:?} before retrying {}", delay, label);
                tokio::time::sleep(delay).await;

                if stop.is_some_and(|s| s.load(Ordering::SeqCst)) {
                    warn!("Not retrying {} past the deadline: {}", label, err);
                    return Err(err);
                }
            }
        }
    }
}
