//! Environment variable names used throughout devtools-gate configuration

/// Listener and upstream addressing
pub const EXTERNAL_DEBUG_PORT: &str = "EXTERNAL_DEBUG_PORT";
pub const INTERNAL_DEBUG_HOST: &str = "INTERNAL_DEBUG_HOST";
pub const INTERNAL_DEBUG_PORT: &str = "INTERNAL_DEBUG_PORT";

/// Authentication
pub const DEVTOOLS_TOKEN: &str = "DEVTOOLS_TOKEN";
pub const DEVTOOLS_AUTH_REALM: &str = "DEVTOOLS_AUTH_REALM";

/// Proxy behavior
pub const UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
pub const PASS_THROUGH_UPSTREAM_ERRORS: &str = "PASS_THROUGH_UPSTREAM_ERRORS";
pub const CONCURRENT_CONNECTIONS: &str = "CONCURRENT_CONNECTIONS";

/// Variables whose values must never be printed
pub const SENSITIVE_VARS: &[&str] = &[DEVTOOLS_TOKEN];

/// Get all environment variable names for documentation/validation
pub fn all_env_vars() -> &'static [&'static str] {
    &[
        EXTERNAL_DEBUG_PORT,
        INTERNAL_DEBUG_HOST,
        INTERNAL_DEBUG_PORT,
        DEVTOOLS_TOKEN,
        DEVTOOLS_AUTH_REALM,
        UPSTREAM_TIMEOUT_SECS,
        PASS_THROUGH_UPSTREAM_ERRORS,
        CONCURRENT_CONNECTIONS,
    ]
}
