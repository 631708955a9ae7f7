//! devtools-gate core - the authenticating pass-through behind devtools-gate
//!
//! This crate provides the request-level pieces of the gate:
//! - Shared-secret Basic Authentication ([`auth`])
//! - Verbatim forwarding to the internal debugging endpoint ([`forwarder`])
//! - The per-request pipeline tying both together ([`request_handler`])
//!
//! # Overview
//!
//! Configuration reaches the handler through the [`ConfigProvider`] trait, so
//! the same pipeline can be driven by environment variables, a CLI or tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use devtools_gate_core::{ProxyConfig, forwarder};
//! use std::sync::Arc;
//!
//! # fn main() -> devtools_gate_core::Result<()> {
//! let config = Arc::new(ProxyConfig {
//!     secret: Some("s3cr3t".to_string()),
//!     ..ProxyConfig::default()
//! });
//! let client = forwarder::build_client(config.as_ref())?;
//! // hand `config` and `client` to request_handler::handle_request per request
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`types`] - Configuration value and provider traits
//! - [`error`] - Error type and result alias
//! - [`headers`] - Header names and per-hop filtering rules
//! - [`defaults`] - Default configuration values
//! - [`auth`] - Basic Authentication gate
//! - [`forwarder`] - Upstream forwarding
//! - [`request_handler`] - Request pipeline

#![forbid(unsafe_code)]

pub mod auth;
pub mod defaults;
pub mod error;
pub mod forwarder;
pub mod headers;
pub mod request_handler;
#[cfg(test)]
pub mod test_utils;
pub mod types;

pub use error::{GateError, Result};
pub use types::{
    AuthenticationProvider, ConfigProvider, ProxyConfig, ServingMode, UpstreamErrorPolicy,
    UpstreamProvider,
};
