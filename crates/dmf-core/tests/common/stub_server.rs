//! Minimal HTTP/1.1 server for integration tests.
//!
//! Each request's target (path + query) is recorded and handed to a handler
//! that returns a status code and body. One connection per request.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

pub type Handler = dyn Fn(&str) -> (u16, Vec<u8>) + Send + Sync;

pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Base URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of requests whose target starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }
}

/// Starts a server on a background thread. It runs until the process exits.
pub fn start<F>(handler: F) -> StubServer
where
    F: Fn(&str) -> (u16, Vec<u8>) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler: Arc<Handler> = Arc::new(handler);
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            handle(stream, handler.as_ref(), &seen);
        }
    });
    StubServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

fn handle(mut stream: std::net::TcpStream, handler: &Handler, seen: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    seen.lock().unwrap().push(target.clone());

    let (status, body) = handler(&target);
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}
