//! Default configuration values for devtools-gate.
//!
//! Shared by the environment loader, the CLI and the tests.

/// Default external port the gate listens on (the usual DevTools port).
pub const LISTEN_PORT: u16 = 9222;

/// Default host of the fronted debugging endpoint.
pub const TARGET_HOST: &str = "127.0.0.1";

/// Default port of the fronted debugging endpoint.
pub const TARGET_PORT: u16 = 9223;

/// Default realm advertised in `WWW-Authenticate`.
pub const AUTH_REALM: &str = "Chrome DevTools";

/// Time given to in-flight connections after a shutdown signal.
pub const SHUTDOWN_GRACE_SECS: u64 = 10;
