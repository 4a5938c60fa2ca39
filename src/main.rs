//! dev-proxy
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌───────────────────────────────────────────────────────┐
//!                 │                       DEV PROXY                       │
//!   Browser       │  ┌──────────┐   ┌────────────┐   ┌────────────────┐   │
//!  ───────────────┼─▶│ listener │──▶│ dispatcher │──▶│    routing     │   │
//!                 │  └──────────┘   └─────┬──────┘   │ /v1/ > live >  │   │
//!                 │                       │          │     static     │   │
//!                 │        ┌──────────────┴────┐     └────────────────┘   │
//!                 │        ▼                   ▼                          │
//!                 │  ┌───────────┐      ┌──────────────┐                  │
//!                 │  │ forwarder │      │ static files │                  │
//!                 │  │ (hyper)   │      │ + SPA shell  │                  │
//!                 │  └─────┬─────┘      └──────────────┘                  │
//!                 └────────┼──────────────────────────────────────────────┘
//!                          ▼
//!               API server / front-end dev server
//! ```

use clap::Parser;
use std::process::ExitCode;

use dev_proxy::cli::Cli;
use dev_proxy::lifecycle;
use dev_proxy::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("dev-proxy: {e}");
            return ExitCode::from(lifecycle::StartupError::from(e).exit_code());
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!("dev-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    match lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal");
            eprintln!("dev-proxy: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
