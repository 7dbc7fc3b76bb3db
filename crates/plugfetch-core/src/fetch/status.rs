//! Status-line parsing for the header callback.

/// Returns the status code from a response status line such as
/// `HTTP/1.1 200 OK` or `HTTP/2 304`. Any other header line yields `None`.
pub(crate) fn parse_status_line(line: &str) -> Option<u32> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let proto = parts.next()?;
    if !proto.starts_with("HTTP/") {
        return None;
    }
    let code = parts.next()?;
    if code.len() != 3 {
        return None;
    }
    code.parse::<u32>().ok()
}
