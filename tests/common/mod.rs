//! Shared utilities for integration testing: a proxy spawner and raw-TCP
//! mock upstreams that record what they were asked.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use llm_proxy::config::ProxyConfig;
use llm_proxy::http::HttpServer;

/// Spawn the proxy on `proxy_addr`, forwarding to `upstream_url`.
pub async fn spawn_proxy(proxy_addr: SocketAddr, upstream_url: String) {
    let config = ProxyConfig {
        upstream_url,
        host: proxy_addr.ip().to_string(),
        port: proxy_addr.port(),
    };
    let server = HttpServer::new(config);
    let listener = TcpListener::bind(proxy_addr).await.unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
}

/// A request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path plus query, verbatim from the request line.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 1024];
    let header_end = loop {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?;
    let mut parts = request_line.split(' ');
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = Vec::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&tmp[..n]);
    }
    body.truncate(content_length);

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

/// Start a mock upstream that answers every request with a fixed response
/// and records what it received.
pub async fn start_mock_upstream(
    addr: SocketAddr,
    status: &'static str,
    headers: &'static [(&'static str, &'static str)],
    body: &'static str,
) -> Arc<Mutex<Vec<RecordedRequest>>> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let log = recorded.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let log = log.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request(&mut socket).await {
                            log.lock().unwrap().push(request);
                        }
                        let mut response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                            status,
                            body.len()
                        );
                        for (name, value) in headers {
                            response.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        response.push_str("\r\n");
                        response.push_str(body);
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    recorded
}

/// Start a mock upstream that echoes the request body back under
/// `application/json` and records what it received.
#[allow(dead_code)]
pub async fn start_echo_upstream(addr: SocketAddr) -> Arc<Mutex<Vec<RecordedRequest>>> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let log = recorded.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let log = log.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let body = request.body.clone();
                        log.lock().unwrap().push(request);
                        let head = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            body.len()
                        );
                        let _ = socket.write_all(head.as_bytes()).await;
                        let _ = socket.write_all(&body).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    recorded
}

/// Start a mock upstream that streams SSE chunks over chunked transfer
/// encoding, sleeping `delay` before every chunk after the first.
#[allow(dead_code)]
pub async fn start_sse_upstream(
    addr: SocketAddr,
    chunks: &'static [&'static str],
    delay: Duration,
) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        if read_request(&mut socket).await.is_none() {
                            return;
                        }
                        let head = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\nTransfer-Encoding: chunked\r\n\r\n";
                        if socket.write_all(head.as_bytes()).await.is_err() {
                            return;
                        }
                        let _ = socket.flush().await;
                        for (i, chunk) in chunks.iter().enumerate() {
                            if i > 0 {
                                tokio::time::sleep(delay).await;
                            }
                            let frame = format!("{:x}\r\n{}\r\n", chunk.len(), chunk);
                            if socket.write_all(frame.as_bytes()).await.is_err() {
                                return;
                            }
                            let _ = socket.flush().await;
                        }
                        let _ = socket.write_all(b"0\r\n\r\n").await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a mock upstream that begins an SSE stream and then drops the
/// connection without the terminating chunk.
#[allow(dead_code)]
pub async fn start_broken_sse_upstream(addr: SocketAddr, first_chunk: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        if read_request(&mut socket).await.is_none() {
                            return;
                        }
                        let head = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nTransfer-Encoding: chunked\r\n\r\n";
                        let frame = format!("{:x}\r\n{}\r\n", first_chunk.len(), first_chunk);
                        let _ = socket.write_all(head.as_bytes()).await;
                        let _ = socket.write_all(frame.as_bytes()).await;
                        let _ = socket.flush().await;
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        // no 0-length terminator: the stream just dies
                        drop(socket);
                    });
                }
                Err(_) => break,
            }
        }
    });
}
