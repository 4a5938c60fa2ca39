//! Configuration loading and layering.
//!
//! Precedence, lowest first: built-in defaults, the optional TOML file,
//! then environment variables and command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{InvalidUpstream, ProxyConfig, UpstreamTarget};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Upstream(#[from] InvalidUpstream),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Values that replace whatever the defaults or the config file said.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub host: Option<String>,
    /// Port of a live front-end dev server on localhost.
    pub live_port: Option<u16>,
    pub api_target: Option<String>,
    pub web_dir: Option<PathBuf>,
    pub upstream_timeout_secs: Option<u64>,
    pub metrics_address: Option<String>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Apply every override that was set.
    pub fn apply(self, config: &mut ProxyConfig) -> Result<(), ConfigError> {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(host) = self.host {
            config.listener.host = host;
        }
        if let Some(live_port) = self.live_port {
            config.live_target = Some(UpstreamTarget::localhost(live_port));
        }
        if let Some(api) = self.api_target {
            config.api_target = UpstreamTarget::parse(&api)?;
        }
        if let Some(web_dir) = self.web_dir {
            config.web_dir = web_dir;
        }
        if let Some(secs) = self.upstream_timeout_secs {
            config.timeouts.upstream_secs = secs;
        }
        if let Some(addr) = self.metrics_address {
            config.observability.metrics_address = Some(addr);
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        Ok(())
    }
}

/// Parse configuration from TOML text. Missing keys keep their defaults.
pub fn parse_config(content: &str, path: &Path) -> Result<ProxyConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from a TOML file without validating it.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, path)
}

/// Build the final, validated configuration.
pub fn resolve_config(
    file: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<ProxyConfig, ConfigError> {
    let mut config = match file {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    overrides.apply(&mut config)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
