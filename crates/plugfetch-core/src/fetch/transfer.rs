//! One GET attempt against the catalog.
//!
//! A fresh curl handle per attempt; the body goes to the archive sink only
//! once a 200 status line has been seen. Error bodies are buffered (capped)
//! so they can be reported.

use super::error::FetchError;
use super::sink::ArchiveSink;
use super::status::parse_status_line;
use super::{TransferOptions, HASH_HEADER};
use crate::checksum::ContentHash;
use crate::control::CancelToken;
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::str;
use url::Url;

/// Upper bound on how much of an error body is kept for the error message.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// Successful (non-error) outcome of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Response {
    /// 200: the body is now on disk at the destination.
    Stored { bytes: u64 },
    /// 304: nothing was written.
    NotModified,
}

pub(super) struct Attempt<'a> {
    pub url: &'a Url,
    pub local_hash: Option<&'a ContentHash>,
    pub dest: &'a Path,
    /// Shared across attempts; the sink sets it when it truncates `dest`.
    pub touched: &'a Cell<bool>,
    pub cancel: &'a CancelToken,
    pub opts: &'a TransferOptions,
}

pub(super) fn get(attempt: &Attempt<'_>) -> Result<Response, FetchError> {
    if attempt.cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }

    let opts = attempt.opts;
    let mut easy = curl::easy::Easy::new();
    easy.url(attempt.url.as_str()).map_err(FetchError::Request)?;
    easy.get(true).map_err(FetchError::Request)?;
    easy.follow_location(true).map_err(FetchError::Request)?;
    easy.max_redirections(opts.max_redirections)
        .map_err(FetchError::Request)?;
    easy.useragent(&opts.user_agent).map_err(FetchError::Request)?;
    easy.connect_timeout(opts.connect_timeout)
        .map_err(FetchError::Request)?;
    // Abort if throughput stays below the floor; the hard timeout is a safety net.
    easy.low_speed_limit(opts.low_speed_limit)
        .map_err(FetchError::Request)?;
    easy.low_speed_time(opts.low_speed_time)
        .map_err(FetchError::Request)?;
    easy.timeout(opts.timeout).map_err(FetchError::Request)?;
    easy.progress(true).map_err(FetchError::Request)?;

    let mut list = curl::easy::List::new();
    if let Some(hash) = attempt.local_hash {
        list.append(&format!("{}: {}", HASH_HEADER, hash))
            .map_err(FetchError::Request)?;
    }
    easy.http_headers(list).map_err(FetchError::Request)?;

    let status: Cell<Option<u32>> = Cell::new(None);
    let error_body: RefCell<Vec<u8>> = RefCell::new(Vec::new());
    let mut sink = ArchiveSink::new(attempt.dest, attempt.touched);
    let mut sink_error: Option<FetchError> = None;
    let cancel = attempt.cancel;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Some(code) = str::from_utf8(data).ok().and_then(parse_status_line) {
                    // A new status line starts a new response (redirect hop).
                    status.set(Some(code));
                    error_body.borrow_mut().clear();
                }
                true
            })
            .map_err(FetchError::Request)?;
        transfer
            .write_function(|data| match status.get() {
                Some(200) => match sink.write(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        sink_error = Some(e);
                        Ok(0) // abort transfer
                    }
                },
                Some(304) => Ok(data.len()),
                _ => {
                    let mut body = error_body.borrow_mut();
                    let room = MAX_ERROR_BODY.saturating_sub(body.len());
                    body.extend_from_slice(&data[..data.len().min(room)]);
                    Ok(data.len())
                }
            })
            .map_err(FetchError::Request)?;
        transfer
            .progress_function(|_, _, _, _| !cancel.is_cancelled())
            .map_err(FetchError::Request)?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if let Some(err) = sink_error {
            return Err(err);
        }
        if e.is_aborted_by_callback() && cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        return Err(FetchError::Transport(e));
    }

    let code = easy.response_code().map_err(FetchError::Transport)?;
    tracing::debug!(url = %attempt.url, code, "catalog responded");
    match code {
        200 => {
            let bytes = sink.finish()?;
            Ok(Response::Stored { bytes })
        }
        304 => Ok(Response::NotModified),
        _ => {
            let body = error_body.into_inner();
            Err(FetchError::Status {
                code,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    }
}
