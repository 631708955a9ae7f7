//! Shared fixtures: a raw-socket upstream stub and an in-process gate.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use devtools_gate::{ProxyConfig, forwarder, server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Notify, oneshot};
use tokio::task::JoinHandle;

/// What the upstream stub received for one request.
#[derive(Debug, Clone)]
pub struct Received {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Received {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Stand-in for the browser's debugging endpoint.
pub struct Upstream {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<Received>>>,
}

impl Upstream {
    /// Answers every request with `raw_response`, written as-is.
    pub async fn start(raw_response: &'static str) -> Self {
        Self::spawn(raw_response, None).await
    }

    /// Like [`Upstream::start`], but the first request is only answered once
    /// the returned [`Notify`] is signalled. It is still recorded on arrival.
    pub async fn start_holding_first(raw_response: &'static str) -> (Self, Arc<Notify>) {
        let release = Arc::new(Notify::new());
        let upstream = Self::spawn(raw_response, Some(release.clone())).await;
        (upstream, release)
    }

    async fn spawn(raw_response: &'static str, hold: Option<Arc<Notify>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();
        let first = Arc::new(AtomicBool::new(true));

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let log = log.clone();
                let hold = hold.clone();
                let is_first = first.swap(false, Ordering::SeqCst);
                tokio::spawn(async move {
                    if let Some(request) = read_request(&mut stream).await {
                        log.lock().unwrap().push(request);
                        if let Some(release) = hold.filter(|_| is_first) {
                            release.notified().await;
                        }
                        let _ = stream.write_all(raw_response.as_bytes()).await;
                        let _ = stream.shutdown().await;
                    }
                });
            }
        });

        Self { addr, received }
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    /// Polls until `count` requests have arrived, panicking after two seconds.
    pub async fn wait_for(&self, count: usize) {
        for _ in 0..200 {
            if self.received.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("upstream never received {count} request(s)");
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<Received> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_len = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_len]).into_owned();
    let mut lines = head.lines();
    let request_line = lines.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();
    let expected = headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[head_len..].to_vec();
    while body.len() < expected {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(Received {
        request_line,
        headers,
        body,
    })
}

/// A gate served in-process on an ephemeral localhost port.
pub struct Gate {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<devtools_gate_core::Result<()>>,
}

impl Gate {
    pub async fn start(config: ProxyConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = forwarder::build_client(&config).unwrap();
        let mode = config.serving_mode;
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(server::serve(
            listener,
            Arc::new(config),
            mode,
            client,
            async move {
                let _ = rx.await;
            },
        ));

        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Signals shutdown and waits for the accept loop to return.
    pub async fn stop(mut self) -> devtools_gate_core::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap()
    }
}

/// Configuration pointing at `upstream`, without authentication.
pub fn config_for(upstream: SocketAddr) -> ProxyConfig {
    ProxyConfig {
        target_host: upstream.ip().to_string(),
        target_port: upstream.port(),
        ..ProxyConfig::default()
    }
}

/// An address with nothing listening.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
