use crate::config::RetryConfig;
use std::time::Duration;

/// Why a fetch attempt failed, as far as retrying is concerned.
///
/// `classify_curl_error` and `classify_http_status` produce these from the
/// catalog transfer; every other `FetchError` is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// curl gave up waiting: connect timeout, total timeout or the
    /// low-speed limit.
    Timeout,
    /// Catalog answered 429 or 503.
    Throttled,
    /// Could not resolve or connect, or the connection dropped mid-body
    /// (recv/send failure, short body).
    Connection,
    /// Any other 5xx from the catalog.
    Http5xx(u16),
    /// 4xx and other statuses, local file errors, cancellation and
    /// callback aborts. Never retried.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// How many catalog requests one fetch may make, and how long to wait
/// between them. The wait before attempt n+1 is `base_delay * 2^(n-1)`,
/// clamped to `max_delay`. Loaded from the `[retry]` config section.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total requests per fetch; 1 disables retrying.
    pub max_attempts: u32,
    /// Wait after the first failed attempt.
    pub base_delay: Duration,
    /// Longest single wait.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// `attempt` is 1-based (1 = first attempt).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout
            | ErrorKind::Connection
            | ErrorKind::Throttled
            | ErrorKind::Http5xx(_) => {
                // base * 2^(attempt-1), capped.
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
                RetryDecision::RetryAfter(delay)
            }
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        // Negative or NaN seconds from a hand-edited config fall back to no delay.
        let base_secs = if cfg.base_delay_secs.is_finite() && cfg.base_delay_secs > 0.0 {
            cfg.base_delay_secs
        } else {
            0.0
        };
        Self {
            max_attempts: cfg.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(base_secs),
            max_delay: Duration::from_secs(cfg.max_delay_secs),
        }
    }
}
