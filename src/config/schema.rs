//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits so the same structure can be loaded from a
//! TOML file and then overridden from the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Port the proxy listens on when none is given.
pub const DEFAULT_PORT: u16 = 8080;

/// Port of the live front-end dev server when `--live` is given without one.
pub const DEFAULT_LIVE_PORT: u16 = 8081;

/// API server the `/v1/` prefix is forwarded to.
pub const DEFAULT_API_TARGET: &str = "http://localhost:3001";

/// Directory holding the compiled web bundle in static mode.
pub const DEFAULT_WEB_DIR: &str = "build/web";

/// Requests under this prefix always go to the API upstream.
pub const DEFAULT_API_PREFIX: &str = "/v1/";

/// Root configuration for the dev proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Upstream receiving every request under `api_prefix`.
    pub api_target: UpstreamTarget,

    /// Live front-end dev server. Absent means static mode.
    pub live_target: Option<UpstreamTarget>,

    /// Compiled web bundle served in static mode.
    pub web_dir: PathBuf,

    /// Path prefix reserved for the API.
    pub api_prefix: String,

    /// Upstream timeouts.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            api_target: UpstreamTarget::localhost(3001),
            live_target: None,
            web_dir: PathBuf::from(DEFAULT_WEB_DIR),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeouts: TimeoutConfig::default(),
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ProxyConfig {
    /// Operating mode, derived from whether a live target is configured.
    pub fn mode(&self) -> Mode {
        if self.live_target.is_some() {
            Mode::Live
        } else {
            Mode::Static
        }
    }

    /// The root document served for client-side routes.
    pub fn index_document(&self) -> PathBuf {
        self.web_dir.join("index.html")
    }
}

/// Whether non-API traffic goes to a live dev server or to static files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Static,
    Live,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Static => f.write_str("static"),
            Mode::Live => f.write_str("live"),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port to bind.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ListenerConfig {
    /// `host:port`, with IPv6 literals bracketed.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// TCP connect timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the upstream to answer with a response head, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest request body read before forwarding.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Prometheus scrape endpoint bind address. Disabled when absent.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}

/// Rejected upstream base URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid upstream URL {value:?}: {reason}")]
pub struct InvalidUpstream {
    pub value: String,
    pub reason: String,
}

/// Base URL of an upstream HTTP server.
///
/// Always `http://host[:port][/base]` with no trailing slash, so a request's
/// path and query can be appended verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct UpstreamTarget {
    base: String,
}

impl UpstreamTarget {
    /// Parse and normalize an upstream base URL.
    pub fn parse(raw: &str) -> Result<Self, InvalidUpstream> {
        let invalid = |reason: &str| InvalidUpstream {
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "http" {
            return Err(invalid("only http:// upstreams are supported"));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment"));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid("must not carry credentials"));
        }

        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// `http://localhost:<port>`.
    pub fn localhost(port: u16) -> Self {
        Self {
            base: format!("http://localhost:{port}"),
        }
    }

    /// The normalized base URL.
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// TCP port the upstream listens on (80 when the URL names none).
    pub fn port(&self) -> u16 {
        Url::parse(&self.base)
            .ok()
            .and_then(|url| url.port_or_known_default())
            .unwrap_or(80)
    }

    /// Upstream URL for a request: the base followed by the original
    /// path and query, unmodified.
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

impl TryFrom<String> for UpstreamTarget {
    type Error = InvalidUpstream;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UpstreamTarget> for String {
    fn from(target: UpstreamTarget) -> Self {
        target.base
    }
}
