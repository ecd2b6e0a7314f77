//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use site_mirror::config::MirrorConfig;
use site_mirror::http::MirrorServer;
use site_mirror::lifecycle::Shutdown;

/// One request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start a mock upstream that records every request and returns a fixed
/// body. Binds an ephemeral port first and hands the bound address to
/// `make_body`, so bodies can embed the upstream's own origin.
pub async fn start_mock_upstream(
    make_body: impl FnOnce(SocketAddr) -> String,
    content_type: &'static str,
) -> (SocketAddr, Arc<Mutex<Vec<CapturedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_handle = log.clone();
    let response_body: Arc<str> = make_body(addr).into();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let log = log_handle.clone();
                    let body = response_body.clone();
                    tokio::spawn(async move {
                        serve_one(socket, &body, content_type, log).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Start a mock upstream that content-negotiates the way a real origin
/// does: a request advertising gzip support gets opaque bytes labeled
/// `Content-Encoding: gzip`, anything else gets the plain body.
pub async fn start_negotiating_upstream(
    make_body: impl FnOnce(SocketAddr) -> String,
) -> (SocketAddr, Arc<Mutex<Vec<CapturedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_handle = log.clone();
    let plain_body: Arc<str> = make_body(addr).into();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let log = log_handle.clone();
                    let plain = plain_body.clone();
                    tokio::spawn(async move {
                        let Some(seen) = read_request(&mut socket).await else {
                            return;
                        };
                        let wants_gzip = seen
                            .header("accept-encoding")
                            .is_some_and(|v| v.contains("gzip"));
                        log.lock().unwrap().push(seen);

                        if wants_gzip {
                            // Not a real gzip stream; opaque on purpose.
                            let body = b"\x1f\x8b\x08\x00opaque-compressed-bytes";
                            let head = format!(
                                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Encoding: gzip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                                body.len()
                            );
                            let _ = socket.write_all(head.as_bytes()).await;
                            let _ = socket.write_all(body).await;
                        } else {
                            let response = format!(
                                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                plain.len(),
                                plain
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                        }
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Start a mock upstream that accepts connections and never responds,
/// for exercising the fetch timeout.
pub async fn start_stalled_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        // Hold the connection open without ever writing.
                        let _socket = socket;
                        tokio::time::sleep(std::time::Duration::from_secs(600)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn serve_one(
    mut socket: TcpStream,
    response_body: &str,
    content_type: &str,
    log: Arc<Mutex<Vec<CapturedRequest>>>,
) {
    let Some(seen) = read_request(&mut socket).await else {
        return;
    };
    log.lock().unwrap().push(seen);

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nServer: mock-upstream\r\nX-Powered-By: PHP/8.2\r\nConnection: close\r\n\r\n{}",
        content_type,
        response_body.len(),
        response_body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Read one request head plus as much body as Content-Length announces.
async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| {
            line.split_once(':')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        })
        .collect();

    let content_length: usize = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        body.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        request_line,
        headers,
        body,
    })
}

/// Start a mirror server on an ephemeral port with the given config.
/// Returns the mirror address and the shutdown handle that stops it.
pub async fn start_mirror(config: MirrorConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = MirrorServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// Config pointing the mirror at a local mock upstream.
pub fn mirror_config(upstream: SocketAddr, base_path: &str) -> MirrorConfig {
    let mut config = MirrorConfig::default();
    config.upstream.target_url = format!("http://{}{}", upstream, base_path);
    config.upstream.allowed_hosts = vec!["127.0.0.1".to_string(), "localhost".to_string()];
    config
}
