//! Aggregator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::{RetryPolicy, DEFAULT_RATE_LIMIT_WAIT};

/// Configuration for a cast aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Maximum concurrent cast lookups (worker pool size).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Overall budget for one run (seconds).
    /// When it elapses the counts collected so far are returned.
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,

    /// Maximum retries of a timed-out request.
    /// Unset retries until success or the deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Delay between retries (milliseconds, 0 = retry immediately).
    #[serde(default)]
    pub retry_backoff_ms: u64,

    /// Minimum delay before retrying a rate-limited request (milliseconds).
    #[serde(default = "default_rate_limit_wait")]
    pub rate_limit_wait_ms: u64,
}

fn default_concurrency() -> usize {
    10
}

fn default_deadline() -> u64 {
    600 // 10 minutes
}

fn default_rate_limit_wait() -> u64 {
    DEFAULT_RATE_LIMIT_WAIT.as_millis() as u64
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            deadline_secs: default_deadline(),
            max_retries: None,
            retry_backoff_ms: 0,
            rate_limit_wait_ms: default_rate_limit_wait(),
        }
    }
}

impl AggregatorConfig {
    /// Set the worker pool size.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the run deadline in seconds.
    pub fn with_deadline_secs(mut self, deadline_secs: u64) -> Self {
        self.deadline_secs = deadline_secs;
        self
    }

    /// Cap retries of timed-out requests.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Run deadline as a duration.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    /// Retry policy described by this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::unbounded()
            .with_backoff(Duration::from_millis(self.retry_backoff_ms))
            .with_rate_limit_wait(Duration::from_millis(self.rate_limit_wait_ms));
        match self.max_retries {
            Some(max) => policy.with_max_retries(max),
            None => policy,
        }
    }
}
