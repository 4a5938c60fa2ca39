//! TCP listener setup.
//!
//! # Responsibilities
//! - Bind to the configured host and port
//! - Turn "address in use" into a readable diagnostic

use std::io::ErrorKind;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Another process already owns the port.
    #[error("port {port} is already in use on {host}")]
    AddrInUse { host: String, port: u16 },

    /// Any other bind failure (permissions, unknown host, ...).
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bind to the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let address = config.bind_address();

    let listener = TcpListener::bind(&address).await.map_err(|source| {
        if source.kind() == ErrorKind::AddrInUse {
            ListenerError::AddrInUse {
                host: config.host.clone(),
                port: config.port,
            }
        } else {
            ListenerError::Bind {
                address: address.clone(),
                source,
            }
        }
    })?;

    let local_addr = listener.local_addr().map_err(|source| ListenerError::Bind {
        address: address.clone(),
        source,
    })?;

    tracing::info!(address = %local_addr, "Listener bound");

    Ok(listener)
}
