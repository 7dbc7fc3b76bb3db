//! Minimal HTTP/1.1 catalog server for integration tests.
//!
//! Answers each GET with the next scripted `Reply` (the last one repeats) and
//! records the request line and headers so tests can assert on what the
//! fetcher sent.

use plugfetch_core::checksum::sha256_bytes;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with the body, or 304 if `X-Plugin-Hash` matches sha256(body).
    Archive(Vec<u8>),
    /// Unconditional 304.
    NotModified,
    /// Any status with a body.
    Status(u16, Vec<u8>),
    /// 200 that sends the prefix, then stalls without finishing the body.
    Stall(Vec<u8>),
    /// 200 that promises more than it sends, then closes the connection.
    Truncated(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

struct Script {
    replies: Vec<Reply>,
    next: usize,
}

impl Script {
    fn take(&mut self) -> Reply {
        let i = self.next.min(self.replies.len() - 1);
        self.next += 1;
        self.replies[i].clone()
    }
}

pub struct CatalogServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl CatalogServer {
    /// Serves `body` as every archive, honouring the hash header.
    pub fn archive(body: Vec<u8>) -> Self {
        Self::scripted(vec![Reply::Archive(body)])
    }

    pub fn scripted(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty(), "script needs at least one reply");
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let script = Arc::new(Mutex::new(Script { replies, next: 0 }));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let script = Arc::clone(&script);
                let recorded = Arc::clone(&recorded);
                thread::spawn(move || handle(stream, &script, &recorded));
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{}/public/", port),
            requests,
        }
    }

    /// Catalog base URL, e.g. `http://127.0.0.1:12345/public/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn handle(mut stream: TcpStream, script: &Mutex<Script>, recorded: &Mutex<Vec<RecordedRequest>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let reply = script.lock().unwrap().take();
    let hash_header = request.header("x-plugin-hash").map(str::to_string);
    recorded.lock().unwrap().push(request);

    match reply {
        Reply::Archive(body) => {
            if hash_header.as_deref() == Some(sha256_bytes(&body).as_str()) {
                write_response(&mut stream, "304 Not Modified", None);
            } else {
                write_response(&mut stream, "200 OK", Some(&body));
            }
        }
        Reply::NotModified => write_response(&mut stream, "304 Not Modified", None),
        Reply::Status(code, body) => {
            let status = format!("{} {}", code, reason(code));
            write_response(&mut stream, &status, Some(&body));
        }
        Reply::Stall(prefix) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                prefix.len() + 1024 * 1024
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&prefix);
            let _ = stream.flush();
            thread::sleep(Duration::from_secs(10));
        }
        Reply::Truncated(prefix) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                prefix.len() + 100
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&prefix);
            let _ = stream.flush();
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

fn write_response(stream: &mut TcpStream, status: &str, body: Option<&[u8]>) {
    let head = match body {
        Some(b) => format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            b.len()
        ),
        None => format!("HTTP/1.1 {}\r\nConnection: close\r\n\r\n", status),
    };
    let _ = stream.write_all(head.as_bytes());
    if let Some(b) = body {
        let _ = stream.write_all(b);
    }
    let _ = stream.flush();
}

fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        304 => "Not Modified",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Reads up to the blank line ending the request head (GET has no body).
fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let text = String::from_utf8_lossy(&data);
    let mut lines = text.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    Some(RecordedRequest {
        method,
        path,
        headers,
    })
}
