//! Minimal HTTP/1.1 server standing in for the upstream lookup endpoint.
//!
//! Answers every GET with a fixed status and body and records the request
//! targets it saw, so tests can check the query the resolver sent.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

pub struct EchoServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/get".
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl EchoServer {
    /// Request targets (path + query) received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serves `{"args":{}}` with 200.
pub fn start_ok() -> EchoServer {
    start(200, "application/json", r#"{"args":{},"url":"echo"}"#)
}

/// Starts a server in a background thread; runs until the process exits.
pub fn start(status: u16, content_type: &'static str, body: &'static str) -> EchoServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, status, content_type, body, &seen));
        }
    });
    EchoServer {
        url: format!("http://127.0.0.1:{}/get", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    status: u16,
    content_type: &str,
    body: &str,
    seen: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("").to_string();
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    seen.lock().unwrap().push(target);
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
