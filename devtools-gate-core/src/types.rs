//! Configuration types for devtools-gate.
//!
//! [`ProxyConfig`] is built once at startup and shared read-only by every
//! connection handler. The handler itself only sees the composable
//! provider traits, so tests and embedders can supply their own source.

use std::time::Duration;

use crate::defaults;

// ============================================================================
// Composable Configuration Traits
// ============================================================================

/// Configuration for the Basic Authentication gate.
pub trait AuthenticationProvider: Send + Sync {
    /// Returns the shared secret, if configured.
    fn secret(&self) -> Option<&str>;

    /// Returns the realm for the `WWW-Authenticate` header.
    fn auth_realm(&self) -> &str;

    /// Returns true if requests must carry the shared secret.
    ///
    /// An empty secret counts as unset.
    fn is_auth_enabled(&self) -> bool {
        self.secret().is_some_and(|s| !s.is_empty())
    }
}

/// Configuration for the fronted debugging endpoint.
pub trait UpstreamProvider: Send + Sync {
    /// Returns the host of the internal endpoint.
    fn target_host(&self) -> &str;

    /// Returns the port of the internal endpoint.
    fn target_port(&self) -> u16;

    /// Returns the upstream timeout. `None` means forwarding is unbounded.
    fn upstream_timeout(&self) -> Option<Duration>;

    /// Returns how upstream error statuses are reported to the client.
    fn upstream_error_policy(&self) -> UpstreamErrorPolicy;

    /// Builds the upstream URL for a path-and-query, copied verbatim.
    fn target_url(&self, path_and_query: &str) -> String {
        format!(
            "http://{}:{}{}",
            self.target_host(),
            self.target_port(),
            path_and_query
        )
    }
}

/// Trait for complete configuration injection.
///
/// # Example
///
/// ```
/// use devtools_gate_core::{AuthenticationProvider, UpstreamProvider, UpstreamErrorPolicy};
/// use std::time::Duration;
///
/// struct MyConfig;
///
/// impl AuthenticationProvider for MyConfig {
///     fn secret(&self) -> Option<&str> { Some("s3cr3t") }
///     fn auth_realm(&self) -> &str { "Chrome DevTools" }
/// }
///
/// impl UpstreamProvider for MyConfig {
///     fn target_host(&self) -> &str { "127.0.0.1" }
///     fn target_port(&self) -> u16 { 9223 }
///     fn upstream_timeout(&self) -> Option<Duration> { None }
///     fn upstream_error_policy(&self) -> UpstreamErrorPolicy { UpstreamErrorPolicy::Collapse }
/// }
/// ```
pub trait ConfigProvider: AuthenticationProvider + UpstreamProvider {}

impl<T> ConfigProvider for T where T: AuthenticationProvider + UpstreamProvider {}

// ============================================================================
// Policies
// ============================================================================

/// How an upstream 4xx/5xx status is reported to the client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpstreamErrorPolicy {
    /// Treat the error status as a forwarding failure and answer 502.
    #[default]
    Collapse,
    /// Relay the upstream status, headers and body unchanged.
    PassThrough,
}

/// How the listener schedules accepted connections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ServingMode {
    /// One connection is fully served before the next is accepted.
    #[default]
    Sequential,
    /// Each connection runs on its own task.
    Concurrent,
}

// ============================================================================
// ProxyConfig
// ============================================================================

/// Process-lifetime configuration of the gate.
///
/// # Example
///
/// ```
/// use devtools_gate_core::{AuthenticationProvider, ProxyConfig, UpstreamProvider};
///
/// let config = ProxyConfig::default();
/// assert_eq!(config.listen_port, 9222);
/// assert_eq!(config.target_url("/json"), "http://127.0.0.1:9223/json");
/// assert!(!config.is_auth_enabled());
/// ```
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    /// Port bound on all interfaces
    pub listen_port: u16,
    /// Host of the internal debugging endpoint
    pub target_host: String,
    /// Port of the internal debugging endpoint
    pub target_port: u16,
    /// Shared secret; `None` disables authentication
    pub secret: Option<String>,
    /// Realm advertised on 401 responses
    pub auth_realm: String,
    /// Upstream timeout (`None` = unbounded)
    pub upstream_timeout: Option<Duration>,
    /// Reporting of upstream error statuses
    pub upstream_errors: UpstreamErrorPolicy,
    /// Connection scheduling
    pub serving_mode: ServingMode,
}

impl ProxyConfig {
    /// Returns `true` if the configuration is usable.
    ///
    /// Both ports must be non-zero and distinct when the target is local,
    /// and the target host must not be empty.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validates the configuration, describing the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 || self.target_port == 0 {
            return Err("Ports must be greater than 0".to_string());
        }
        if self.target_host.trim().is_empty() {
            return Err("Target host cannot be empty".to_string());
        }
        if self.listen_port == self.target_port && is_loopback_host(&self.target_host) {
            return Err(format!(
                "Listen port {} would forward to itself",
                self.listen_port
            ));
        }
        Ok(())
    }
}

fn is_loopback_host(host: &str) -> bool {
    host == "localhost"
        || host
            .parse::<std::net::IpAddr>()
            .is_ok_and(|ip| ip.is_loopback() || ip.is_unspecified())
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_port: defaults::LISTEN_PORT,
            target_host: defaults::TARGET_HOST.to_string(),
            target_port: defaults::TARGET_PORT,
            secret: None,
            auth_realm: defaults::AUTH_REALM.to_string(),
            upstream_timeout: None,
            upstream_errors: UpstreamErrorPolicy::default(),
            serving_mode: ServingMode::default(),
        }
    }
}

impl AuthenticationProvider for ProxyConfig {
    fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    fn auth_realm(&self) -> &str {
        &self.auth_realm
    }
}

impl UpstreamProvider for ProxyConfig {
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
