//! Configuration loading for devtools-gate.
//!
//! The gate's [`ProxyConfig`] is read from environment variables exactly once
//! at startup, then adjusted by command line overrides. The resulting value is
//! never mutated afterwards and is shared read-only by every connection.
//!
//! # Example
//!
//! ```
//! use devtools_gate::config;
//!
//! let config = config::from_env();
//! println!("Forwarding to {}:{}", config.target_host, config.target_port);
//! ```

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::args::Args;
use crate::env_vars;
use devtools_gate_core::{GateError, ProxyConfig, Result, ServingMode, UpstreamErrorPolicy, defaults};

// ============================================================================
// Internal Helpers
// ============================================================================

/// Parses an environment variable with fallback to a default value.
///
/// Logs a warning if the value exists but cannot be parsed.
fn parse_env_var_or_default<T, F>(env_var: &F, var_name: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> std::result::Result<String, env::VarError>,
{
    match env_var(var_name) {
        Ok(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(var = var_name, value = %value, "Invalid env var value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

/// Parses a boolean flag such as `true`, `1`, `yes` or `off`.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Reads a boolean flag, logging a warning and returning `false` when invalid.
fn parse_env_flag<F>(env_var: &F, var_name: &str) -> bool
where
    F: Fn(&str) -> std::result::Result<String, env::VarError>,
{
    match env_var(var_name) {
        Ok(value) => parse_flag(&value).unwrap_or_else(|| {
            warn!(var = var_name, value = %value, "Invalid boolean env var, using false");
            false
        }),
        Err(_) => false,
    }
}

/// Reads a string variable, treating blank values as unset.
fn non_empty_env<F>(env_var: &F, var_name: &str) -> Option<String>
where
    F: Fn(&str) -> std::result::Result<String, env::VarError>,
{
    env_var(var_name).ok().filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Public Configuration Loading
// ============================================================================

/// Builds the configuration from the process environment.
///
/// - `EXTERNAL_DEBUG_PORT`: listen port (default: 9222)
/// - `INTERNAL_DEBUG_HOST`: upstream host (default: 127.0.0.1)
/// - `INTERNAL_DEBUG_PORT`: upstream port (default: 9223)
/// - `DEVTOOLS_TOKEN`: shared secret (default: unset, no authentication)
/// - `DEVTOOLS_AUTH_REALM`: realm on 401 responses (default: Chrome DevTools)
/// - `UPSTREAM_TIMEOUT_SECS`: upstream timeout (default: unset, 0 = none)
/// - `PASS_THROUGH_UPSTREAM_ERRORS`: relay 4xx/5xx statuses (default: false)
/// - `CONCURRENT_CONNECTIONS`: serve connections concurrently (default: false)
pub fn from_env() -> ProxyConfig {
    compute_proxy_config(|key| env::var(key))
}

/// Computes the configuration from an environment lookup function.
fn compute_proxy_config<F>(env_var: F) -> ProxyConfig
where
    F: Fn(&str) -> std::result::Result<String, env::VarError>,
{
    let listen_port =
        parse_env_var_or_default(&env_var, env_vars::EXTERNAL_DEBUG_PORT, defaults::LISTEN_PORT);
    let target_host = non_empty_env(&env_var, env_vars::INTERNAL_DEBUG_HOST)
        .map(|h| h.trim().to_string())
        .unwrap_or_else(|| defaults::TARGET_HOST.to_string());
    let target_port =
        parse_env_var_or_default(&env_var, env_vars::INTERNAL_DEBUG_PORT, defaults::TARGET_PORT);

    // The secret is kept byte for byte; only an empty value means "unset"
    let secret = env_var(env_vars::DEVTOOLS_TOKEN)
        .ok()
        .filter(|s| !s.is_empty());
    let auth_realm = non_empty_env(&env_var, env_vars::DEVTOOLS_AUTH_REALM)
        .unwrap_or_else(|| defaults::AUTH_REALM.to_string());

    let timeout_secs: u64 = parse_env_var_or_default(&env_var, env_vars::UPSTREAM_TIMEOUT_SECS, 0);
    let upstream_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

    let upstream_errors = if parse_env_flag(&env_var, env_vars::PASS_THROUGH_UPSTREAM_ERRORS) {
        UpstreamErrorPolicy::PassThrough
    } else {
        UpstreamErrorPolicy::Collapse
    };

    let serving_mode = if parse_env_flag(&env_var, env_vars::CONCURRENT_CONNECTIONS) {
        ServingMode::Concurrent
    } else {
        ServingMode::Sequential
    };

    ProxyConfig {
        listen_port,
        target_host,
        target_port,
        secret,
        auth_realm,
        upstream_timeout,
        upstream_errors,
        serving_mode,
    }
}

/// Applies command line overrides on top of an environment-derived configuration.
pub fn apply_args(mut config: ProxyConfig, args: &Args) -> ProxyConfig {
    if let Some(port) = args.listen {
        config.listen_port = port;
    }
    if let Some(host) = &args.target_host {
        config.target_host = host.clone();
    }
    if let Some(port) = args.target_port {
        config.target_port = port;
    }
    if args.concurrent {
        config.serving_mode = ServingMode::Concurrent;
    }
    config
}

/// Loads the final configuration: environment, then CLI overrides, then validation.
///
/// # Errors
///
/// Returns [`GateError::Config`] when the combined configuration is unusable.
pub fn load(args: &Args) -> Result<ProxyConfig> {
    let config = apply_args(from_env(), args);
    config.validate().map_err(GateError::Config)?;
    Ok(config)
}
