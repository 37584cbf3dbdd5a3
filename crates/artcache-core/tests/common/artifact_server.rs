//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves one resource at every path. Answers GET with 200 and the body,
//! answers HEAD with 304 when `If-None-Match` / `If-Modified-Since` match the
//! current validators, and can be told to fail with a fixed status or by
//! dropping connections. Counts requests per method.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Resource {
    pub body: Vec<u8>,
    /// Sent verbatim as `ETag` when set (an empty string sends an empty header).
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    /// Answer every HEAD with this status instead.
    pub head_status: Option<u16>,
    /// Answer every GET with this status instead.
    pub get_status: Option<u16>,
    /// Close connections without answering.
    pub drop_connections: bool,
}

impl Resource {
    pub fn new(body: &[u8]) -> Self {
        Self {
            body: body.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_etag(mut self, etag: &str) -> Self {
        self.etag = Some(etag.to_string());
        self
    }

    pub fn with_last_modified(mut self, lm: &str) -> Self {
        self.last_modified = Some(lm.to_string());
        self
    }
}

struct State {
    resource: Mutex<Resource>,
    heads: AtomicUsize,
    gets: AtomicUsize,
}

pub struct ArtifactServer {
    base: String,
    state: Arc<State>,
}

impl ArtifactServer {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start(resource: Resource) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(State {
            resource: Mutex::new(resource),
            heads: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
        });
        let server_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&server_state);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub fn heads(&self) -> usize {
        self.state.heads.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.state.gets.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.heads() + self.gets()
    }

    pub fn update(&self, f: impl FnOnce(&mut Resource)) {
        f(&mut self.state.resource.lock().unwrap());
    }
}

/// A URL on a port nothing listens on; connecting is refused immediately.
pub fn refused_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/{}", port, path)
}

fn handle(mut stream: TcpStream, state: &State) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let req = parse_request(request);
    let resource = state.resource.lock().unwrap().clone();

    let is_head = req.method.eq_ignore_ascii_case("HEAD");
    if is_head {
        state.heads.fetch_add(1, Ordering::SeqCst);
    } else if req.method.eq_ignore_ascii_case("GET") {
        state.gets.fetch_add(1, Ordering::SeqCst);
    } else {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n");
        return;
    }

    if resource.drop_connections {
        return;
    }

    let forced = if is_head {
        resource.head_status
    } else {
        resource.get_status
    };
    if let Some(status) = forced {
        let response = format!(
            "HTTP/1.1 {} Forced\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            status
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let mut validators = String::new();
    if let Some(etag) = &resource.etag {
        validators.push_str(&format!("ETag: {}\r\n", etag));
    }
    if let Some(lm) = &resource.last_modified {
        validators.push_str(&format!("Last-Modified: {}\r\n", lm));
    }

    if is_head && not_modified(&req, &resource) {
        let response = format!(
            "HTTP/1.1 304 Not Modified\r\n{}Connection: close\r\n\r\n",
            validators
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        resource.body.len(),
        validators
    );
    let _ = stream.write_all(response.as_bytes());
    if !is_head {
        let _ = stream.write_all(&resource.body);
    }
}

fn not_modified(req: &Request, resource: &Resource) -> bool {
    if let Some(inm) = &req.if_none_match {
        return resource.etag.as_deref() == Some(inm.as_str());
    }
    if let Some(ims) = &req.if_modified_since {
        return resource.last_modified.as_deref() == Some(ims.as_str());
    }
    false
}

struct Request {
    method: String,
    if_none_match: Option<String>,
    if_modified_since: Option<String>,
}

fn parse_request(request: &str) -> Request {
    let mut req = Request {
        method: String::new(),
        if_none_match: None,
        if_modified_since: None,
    };
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if req.method.is_empty() {
            req.method = line.split_whitespace().next().unwrap_or("").to_string();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.eq_ignore_ascii_case("if-none-match") {
                req.if_none_match = Some(value.trim().to_string());
            } else if name.eq_ignore_ascii_case("if-modified-since") {
                req.if_modified_since = Some(value.trim().to_string());
            }
        }
    }
    req
}
