//! devtools-gate - Basic-Auth gate in front of a browser's debugging port
//!
//! A browser started with `--remote-debugging-port` should only listen on
//! localhost. devtools-gate exposes that port on all interfaces and, when a
//! shared secret is configured, only lets requests through whose Basic
//! Authentication password matches it.
//!
//! # Overview
//!
//! - Sequential, one-request-per-connection serving by default
//! - Any Basic username accepted with the right password (`token:<secret>`
//!   is the conventional form)
//! - Verbatim forwarding of method, path, query, headers and POST/PUT bodies
//! - Upstream failures reported as `502 Proxy error: ...`
//!
//! # Example
//!
//! ```rust,no_run
//! use devtools_gate::{config, server};
//! use devtools_gate_core::forwarder;
//! use std::sync::Arc;
//!
//! # async fn run() -> devtools_gate_core::Result<()> {
//! let config = config::from_env();
//! let client = forwarder::build_client(&config)?;
//! let listener = server::bind(config.listen_port).await?;
//! let mode = config.serving_mode;
//! server::serve(listener, Arc::new(config), mode, client, std::future::pending()).await
//! # }
//! ```
//!
//! # Modules
//!
//! - [`args`] - Command line argument parsing
//! - [`config`] - Configuration loading from environment variables
//! - [`env_vars`] - Environment variable constants
//! - [`server`] - Listener and startup reporting
//! - [`connection`] - In-flight connection tracking
//!
//! # Re-exports from devtools-gate-core
//!
//! - [`auth`] - Basic Authentication gate
//! - [`forwarder`] - Upstream forwarding
//! - [`request_handler`] - Request pipeline

#![forbid(unsafe_code)]

pub mod args;
pub mod config;
pub mod connection;
pub mod env_vars;
pub mod server;

// Re-export devtools-gate-core modules
pub use devtools_gate_core::auth;
pub use devtools_gate_core::forwarder;
pub use devtools_gate_core::request_handler;
pub use devtools_gate_core::types;

pub use devtools_gate_core::{
    AuthenticationProvider, ConfigProvider, GateError, ProxyConfig, ServingMode,
    UpstreamErrorPolicy, UpstreamProvider,
};
