//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use health_aggregator::config::AggregatorConfig;
use health_aggregator::{HttpServer, Shutdown};

/// What the mock backend does for one Host header value.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub enum Reply {
    /// Answer with this status code.
    Status(u16),
    /// Close the connection without answering.
    Hangup,
    /// Wait, then answer with the status code.
    Delayed(u16, Duration),
}

/// Request head as seen by the mock backend.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
}

/// Start a mock backend that answers per Host header.
///
/// Hosts missing from `replies` get a 404. Returns the bound address and the
/// log of request heads received.
pub async fn start_host_backend(
    replies: HashMap<String, Reply>,
) -> (SocketAddr, Arc<Mutex<Vec<SeenRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let replies = Arc::new(replies);

    let log = seen.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let replies = replies.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        handle_connection(socket, &replies, &log).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, seen)
}

async fn handle_connection(
    mut socket: TcpStream,
    replies: &HashMap<String, Reply>,
    log: &Mutex<Vec<SeenRequest>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let request = parse_head(&String::from_utf8_lossy(&buf));
    let host = request.headers.get("host").cloned().unwrap_or_default();
    log.lock().unwrap().push(request);

    let status = match replies.get(&host).copied().unwrap_or(Reply::Status(404)) {
        Reply::Hangup => return,
        Reply::Status(code) => code,
        Reply::Delayed(code, delay) => {
            tokio::time::sleep(delay).await;
            code
        }
    };

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn parse_head(head: &str) -> SeenRequest {
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split(' ');
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    SeenRequest {
        method,
        path,
        headers,
    }
}

/// Config probing `backend` for the given hostnames.
pub fn config_for(backend: SocketAddr, hostnames: &[&str]) -> AggregatorConfig {
    let mut config = AggregatorConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.backend.address = backend.ip().to_string();
    config.backend.port = backend.port();
    config.backend.hostnames = hostnames.iter().map(|h| h.to_string()).collect();
    config
}

/// Start the aggregator on an ephemeral port.
pub async fn start_aggregator(config: AggregatorConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// HTTP client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Reply table from `(host, reply)` pairs.
pub fn replies(entries: &[(&str, Reply)]) -> HashMap<String, Reply> {
    entries.iter().map(|(h, r)| (h.to_string(), *r)).collect()
}
