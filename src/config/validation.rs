//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde and URL parsing handle syntax)
//! - Check the web directory exists when it is actually served
//! - Validate value ranges (timeouts > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function of the config plus the filesystem
//! - Runs after every override has been applied

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::schema::{Mode, ProxyConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("web directory {} does not exist or is not a directory", .0.display())]
    MissingWebDir(PathBuf),

    #[error("api_prefix {0:?} must start with '/'")]
    InvalidApiPrefix(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("metrics address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a fully merged configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.mode() == Mode::Static && !config.web_dir.is_dir() {
        errors.push(ValidationError::MissingWebDir(config.web_dir.clone()));
    }

    if !config.api_prefix.starts_with('/') {
        errors.push(ValidationError::InvalidApiPrefix(config.api_prefix.clone()));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
