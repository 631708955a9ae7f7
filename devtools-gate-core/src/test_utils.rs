//! Test utilities for devtools-gate.
//!
//! Provides a configurable [`TestConfig`] and a raw-socket upstream stub that
//! records exactly what the gate sent over the wire. Only compiled for tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::types::{AuthenticationProvider, UpstreamErrorPolicy, UpstreamProvider};

/// Shared test configuration with builder methods.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub secret: Option<String>,
    pub auth_realm: String,
    pub target_host: String,
    pub target_port: u16,
    pub upstream_timeout: Option<Duration>,
    pub upstream_errors: UpstreamErrorPolicy,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            secret: None,
            auth_realm: "Chrome DevTools".to_string(),
            target_host: "127.0.0.1".to_string(),
            target_port: 9223,
            upstream_timeout: None,
            upstream_errors: UpstreamErrorPolicy::Collapse,
        }
    }
}

impl TestConfig {
    /// Create a configuration without authentication.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the configuration at an upstream address.
    pub fn with_upstream(mut self, addr: SocketAddr) -> Self {
        self.target_host = addr.ip().to_string();
        self.target_port = addr.port();
        self
    }

    /// Require the given shared secret.
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = Some(secret.to_string());
        self
    }

    /// Configure the upstream timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = Some(timeout);
        self
    }

    /// Configure upstream error reporting.
    pub fn with_error_policy(mut self, policy: UpstreamErrorPolicy) -> Self {
        self.upstream_errors = policy;
        self
    }
}

impl AuthenticationProvider for TestConfig {
    fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    fn auth_realm(&self) -> &str {
        &self.auth_realm
    }
}

impl UpstreamProvider for TestConfig {
    fn target_host(&self) -> &str {
        &self.target_host
    }

    fn target_port(&self) -> u16 {
        self.target_port
    }

    fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout
    }

    fn upstream_error_policy(&self) -> UpstreamErrorPolicy {
        self.upstream_errors
    }
}

/// A request as received by [`StubUpstream`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request line, e.g. `GET /json HTTP/1.1`
    pub request_line: String,
    /// Header lines as `(lowercase name, value)` in wire order
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Returns the first value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Upstream stub answering every request with a fixed raw HTTP response.
pub struct StubUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubUpstream {
    /// Starts a stub on an ephemeral localhost port.
    pub async fn start(raw_response: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    if let Some(request) = read_request(&mut stream).await {
                        recorded.lock().unwrap().push(request);
                        let _ = stream.write_all(raw_response.as_bytes()).await;
                        let _ = stream.shutdown().await;
                    }
                });
            }
        });

        Self { addr, requests }
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        request_line,
        headers,
        body,
    })
}

/// Returns an address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TestConfig::new();
        assert!(config.secret.is_none());
        assert!(!config.is_auth_enabled());
        assert_eq!(config.target_url("/json"), "http://127.0.0.1:9223/json");
    }

    #[test]
    fn test_builder_methods() {
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let config = TestConfig::new()
            .with_upstream(addr)
            .with_secret("s3cr3t")
            .with_timeout(Duration::from_secs(1))
            .with_error_policy(UpstreamErrorPolicy::PassThrough);

        assert_eq!(config.target_port, 4000);
        assert!(config.is_auth_enabled());
        assert_eq!(config.upstream_timeout, Some(Duration::from_secs(1)));
        assert_eq!(config.upstream_errors, UpstreamErrorPolicy::PassThrough);
    }
}
