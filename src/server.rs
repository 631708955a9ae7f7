//! Listener and startup reporting.
//!
//! By default connections are served strictly one after another: the next
//! connection is not accepted until the current request, including its full
//! upstream round trip, has been answered. Each connection carries a single
//! request and is answered with HTTP/1.0 framing: no `Connection` header is
//! sent and the socket is closed once the response is written.
//! [`ServingMode::Concurrent`] spawns one task per connection
//! instead, all sharing the same read-only configuration.

use std::convert::Infallible;
use std::env;
use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use hyper::Version;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::connection::ConnectionTracker;
use crate::env_vars;
use devtools_gate_core::{
    AuthenticationProvider, ConfigProvider, ProxyConfig, Result, ServingMode, UpstreamErrorPolicy,
    defaults, request_handler,
};

/// Binds the listen port on all interfaces.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    Ok(TcpListener::bind(addr).await?)
}

/// Accepts and serves connections until `shutdown` resolves.
///
/// In sequential mode a shutdown signal interrupts the connection being
/// served. In concurrent mode the accept loop stops and in-flight connections
/// get [`defaults::SHUTDOWN_GRACE_SECS`] to finish.
pub async fn serve<C, S>(
    listener: TcpListener,
    config: Arc<C>,
    mode: ServingMode,
    http_client: reqwest::Client,
    shutdown: S,
) -> Result<()>
where
    C: ConfigProvider + 'static,
    S: Future<Output = ()>,
{
    let tracker = ConnectionTracker::new();
    tokio::pin!(shutdown);

    loop {
        let (stream, addr) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(err) => {
                    warn!(error = %err, "Failed to accept connection");
                    continue;
                }
            },
            _ = &mut shutdown => break,
        };

        debug!(%addr, "New connection");

        match mode {
            ServingMode::Sequential => {
                tokio::select! {
                    _ = serve_connection(stream, addr, config.clone(), http_client.clone()) => {}
                    _ = &mut shutdown => break,
                }
            }
            ServingMode::Concurrent => {
                let guard = tracker.track();
                let config = config.clone();
                let client = http_client.clone();
                tokio::spawn(async move {
                    serve_connection(stream, addr, config, client).await;
                    drop(guard);
                });
            }
        }
    }

    info!("Shutting down");
    let grace = Duration::from_secs(defaults::SHUTDOWN_GRACE_SECS);
    if !tracker.wait_for_shutdown(grace).await {
        warn!(
            remaining = tracker.count(),
            "Connections still active after grace period"
        );
    }

    Ok(())
}

/// Serves the single request carried by one connection.
///
/// Keep-alive stays enabled while the response head is encoded, otherwise
/// hyper advertises `connection: close` on HTTP/1.1 requests. Once the
/// handler has answered, the connection is shut down gracefully so it
/// closes as soon as the response is flushed.
async fn serve_connection<C>(
    stream: TcpStream,
    addr: SocketAddr,
    config: Arc<C>,
    http_client: reqwest::Client,
) where
    C: ConfigProvider + 'static,
{
    let io = TokioIo::new(stream);
    let answered = Arc::new(Notify::new());

    let notify = answered.clone();
    let service = service_fn(move |req| {
        let config = config.clone();
        let http_client = http_client.clone();
        let notify = notify.clone();
        async move {
            let mut response = request_handler::handle_request(req, config, http_client).await?;
            *response.version_mut() = Version::HTTP_10;
            notify.notify_one();
            Ok::<_, Infallible>(response)
        }
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    let result = tokio::select! {
        result = conn.as_mut() => result,
        _ = answered.notified() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };

    if let Err(err) = result {
        debug!(%addr, error = %err, "Connection error");
    }
}

/// Logs the startup summary.
pub fn print_startup_info(config: &ProxyConfig, verbose: bool) {
    let auth = if config.is_auth_enabled() {
        "with authentication"
    } else {
        "without authentication"
    };
    info!(
        port = config.listen_port,
        "DevTools proxy started on port {} {}", config.listen_port, auth
    );
    info!(
        version = env!("CARGO_PKG_VERSION"),
        target = %format!("{}:{}", config.target_host, config.target_port),
        mode = ?config.serving_mode,
        "Forwarding configuration"
    );

    match config.upstream_timeout {
        Some(timeout) => info!(secs = timeout.as_secs(), "Upstream timeout"),
        None => info!("No upstream timeout: a stalled upstream blocks its connection"),
    }
    if config.upstream_errors == UpstreamErrorPolicy::PassThrough {
        info!("Upstream error statuses are relayed as-is");
    }

    if verbose {
        print_env_config();
    }
}

/// Logs the environment variable configuration (used in verbose mode)
fn print_env_config() {
    for &var_name in env_vars::all_env_vars() {
        match env::var(var_name) {
            Ok(_) if env_vars::SENSITIVE_VARS.contains(&var_name) => {
                debug!(var = var_name, value = "[CONFIGURED]", "Environment");
            }
            Ok(value) => debug!(var = var_name, value = %value, "Environment"),
            Err(_) => debug!(var = var_name, value = "[NOT SET]", "Environment"),
        }
    }
}
