//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the optional metrics exporter
//! - Bind the listener, then announce the route table
//! - Run the server until a signal arrives
//! - Map every failure to a process exit code

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::{ConfigError, ProxyConfig};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::{self, ListenerError};
use crate::observability::metrics;

/// Fatal error before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("failed to start metrics exporter on {address}: {source}")]
    Metrics {
        address: String,
        #[source]
        source: metrics_exporter_prometheus::BuildError,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

impl StartupError {
    /// 2 for configuration problems, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::Config(_) => 2,
            StartupError::Listener(_) | StartupError::Metrics { .. } | StartupError::Serve(_) => 1,
        }
    }
}

/// Run the proxy until SIGINT/SIGTERM.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    // The address was checked by validation; an unparsable one is skipped.
    if let Some(addr) = config
        .observability
        .metrics_address
        .as_deref()
        .and_then(|a| a.parse::<SocketAddr>().ok())
    {
        metrics::init_metrics(addr).map_err(|source| StartupError::Metrics {
            address: addr.to_string(),
            source,
        })?;
        tracing::info!(address = %addr, "Metrics exporter listening");
    }

    let listener = net::bind(&config.listener).await?;
    announce(&config, listener.local_addr()?);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Stopped.");
    Ok(())
}

fn announce(config: &ProxyConfig, bound: SocketAddr) {
    for line in banner(config, bound) {
        tracing::info!("{line}");
    }

    if config.live_target.is_none() {
        let index = config.index_document();
        if !index.is_file() {
            tracing::warn!(
                index = %index.display(),
                "Root document missing; client-side routes will 404"
            );
        }
    }
}

/// Route table shown once the listener is up.
fn banner(config: &ProxyConfig, bound: SocketAddr) -> Vec<String> {
    let mut lines = vec![
        format!("Proxy listening on http://localhost:{}", bound.port()),
        format!("{}*  ->  {}", config.api_prefix, config.api_target),
    ];

    match &config.live_target {
        Some(live) => {
            lines.push(format!("/*  ->  {live}  (live mode)"));
            let port = live.port();
            lines.push(format!(
                "Run your dev server on port {port}, e.g. flutter run -d chrome --web-port={port} --web-hostname=localhost"
            ));
        }
        None => {
            lines.push(format!("/*  ->  {}/  (static mode)", config.web_dir.display()));
        }
    }
    lines
}
