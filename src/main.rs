use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use devtools_gate::args::Args;
use devtools_gate::{config, forwarder, server};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args);

    let config = match config::load(&args) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let http_client = match forwarder::build_client(&config) {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "Failed to initialize upstream client");
            std::process::exit(1);
        }
    };

    let listener = match server::bind(config.listen_port).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(port = config.listen_port, error = %err, "Failed to bind");
            std::process::exit(1);
        }
    };

    server::print_startup_info(&config, args.verbose);

    let mode = config.serving_mode;
    if let Err(err) =
        server::serve(listener, Arc::new(config), mode, http_client, shutdown_signal()).await
    {
        error!(error = %err, "Server error");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the CLI verbosity.
fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    if args.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
