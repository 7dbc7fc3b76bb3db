//! Retry loop: run an attempt until success or policy says stop.

use super::classify::Classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::control::CancelToken;
use std::fmt;

/// Runs `f` until it succeeds or the retry policy says to stop.
/// `f` receives the 1-based attempt number. On a retryable failure, waits
/// for the backoff duration then tries again; the last error is returned.
/// A cancel cuts the wait short and the next attempt runs at once, so `f`
/// must check `cancel` itself and fail with a non-retryable error.
pub fn run_with_retry<T, E, F>(policy: &RetryPolicy, cancel: &CancelToken, mut f: F) -> Result<T, E>
where
    E: Classify + fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, e.error_kind()) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(
                        attempt,
                        delay_ms = d.as_millis() as u64,
                        "attempt failed, retrying: {}",
                        e
                    );
                    if cancel.wait_timeout(d) {
                        tracing::debug!(attempt, "backoff interrupted by cancel");
                    }
                    attempt += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::ErrorKind;
    use std::thread;
    use std::time::{Duration, Instant};

    #[derive(Debug)]
    struct Fail(ErrorKind);

    impl fmt::Display for Fail {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    impl Classify for Fail {
        fn error_kind(&self) -> ErrorKind {
            self.0
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn retries_transient_until_success() {
        let mut seen = Vec::new();
        let out: Result<&str, Fail> = run_with_retry(&fast_policy(5), &CancelToken::new(), |attempt| {
            seen.push(attempt);
            if attempt < 3 {
                Err(Fail(ErrorKind::Connection))
            } else {
                Ok("done")
            }
        });
        assert_eq!(out.unwrap(), "done");
        assert_eq!(seen, [1, 2, 3]);
    }

    #[test]
    fn stops_on_non_retryable() {
        let mut calls = 0;
        let out: Result<(), Fail> = run_with_retry(&fast_policy(5), &CancelToken::new(), |_| {
            calls += 1;
            Err(Fail(ErrorKind::Other))
        });
        assert!(out.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let out: Result<(), Fail> = run_with_retry(&fast_policy(3), &CancelToken::new(), |_| {
            calls += 1;
            Err(Fail(ErrorKind::Http5xx(502)))
        });
        assert!(matches!(out, Err(Fail(ErrorKind::Http5xx(502)))));
        assert_eq!(calls, 3);
    }

    #[test]
    fn cancel_cuts_backoff_short() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(30),
        };
        let cancel = CancelToken::new();
        let canceller = {
            let cancel = cancel.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                cancel.cancel();
            })
        };
        let started = Instant::now();
        let mut calls = 0;
        let out: Result<(), Fail> = run_with_retry(&policy, &cancel, |_| {
            calls += 1;
            if cancel.is_cancelled() {
                Err(Fail(ErrorKind::Other))
            } else {
                Err(Fail(ErrorKind::Throttled))
            }
        });
        canceller.join().unwrap();
        assert!(matches!(out, Err(Fail(ErrorKind::Other))));
        assert_eq!(calls, 2);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
