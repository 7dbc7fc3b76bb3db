//! Retry and backoff policy for catalog requests.
//!
//! Error classification (timeouts, throttling, connection failures) and
//! exponential backoff decisions live here so the fetcher only has to say
//! what one attempt is.

mod classify;
mod policy;
mod run;

pub use classify::{classify_curl_error, classify_http_status, Classify};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
