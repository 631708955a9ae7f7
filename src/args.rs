//! Command line argument parsing for devtools-gate.
//!
//! Every networking option can also be set through the environment (see
//! [`crate::env_vars`]); values given here take precedence. The shared secret
//! is deliberately environment-only so it never shows up in process listings.
//!
//! # Example
//!
//! ```no_run
//! use devtools_gate::args::Args;
//! use clap::Parser;
//!
//! let args = Args::parse();
//! if let Some(port) = args.listen {
//!     println!("Listening on {port}");
//! }
//! ```

use clap::Parser;

/// Command line arguments for devtools-gate.
#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    long_about = "Exposes a browser's remote debugging port on all interfaces while the browser\nitself listens on localhost only. When DEVTOOLS_TOKEN is set, every request must\ncarry it as the password of an HTTP Basic Authentication header.\n\nExample usage:\n  DEVTOOLS_TOKEN=s3cr3t devtools-gate\n  devtools-gate --listen 9222 --target-port 9223 --verbose"
)]
#[command(
    after_help = "Environment variables:\n  EXTERNAL_DEBUG_PORT           Listen port (default: 9222)\n  INTERNAL_DEBUG_HOST           Browser debugging host (default: 127.0.0.1)\n  INTERNAL_DEBUG_PORT           Browser debugging port (default: 9223)\n  DEVTOOLS_TOKEN                Shared secret, enables Basic Authentication\n  DEVTOOLS_AUTH_REALM           Realm sent with 401 (default: Chrome DevTools)\n  UPSTREAM_TIMEOUT_SECS         Upstream timeout, unset or 0 = wait forever\n  PASS_THROUGH_UPSTREAM_ERRORS  Relay upstream 4xx/5xx instead of 502\n  CONCURRENT_CONNECTIONS        Serve connections concurrently"
)]
pub struct Args {
    /// Port to listen on, on all interfaces
    #[arg(
        long,
        short = 'l',
        help = "Listen port for incoming connections",
        value_name = "PORT"
    )]
    pub listen: Option<u16>,

    /// Host of the browser's debugging endpoint
    #[arg(long, help = "Host of the internal debugging endpoint", value_name = "HOST")]
    pub target_host: Option<String>,

    /// Port of the browser's debugging endpoint
    #[arg(
        long,
        short = 't',
        help = "Port of the internal debugging endpoint",
        value_name = "PORT"
    )]
    pub target_port: Option<u16>,

    /// Serve connections concurrently instead of one at a time
    #[arg(long, help = "Serve each connection on its own task")]
    pub concurrent: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', help = "Log every request and show the environment")]
    pub verbose: bool,

    /// Enable quiet mode (minimal output)
    #[arg(
        long,
        short = 'q',
        help = "Only log warnings and errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output logs in JSON format (for structured logging)
    #[arg(long, help = "Output logs in JSON format for structured logging")]
    pub json_logs: bool,
}

impl Args {
    /// Returns the default log filter directive for the chosen verbosity.
    ///
    /// `RUST_LOG` still takes precedence when set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
