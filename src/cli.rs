//! Command-line interface.
//!
//! ```text
//! dev-proxy                     static mode on :8080
//! dev-proxy 3000                static mode on :3000
//! dev-proxy --live              live mode, front-end dev server on :8081
//! dev-proxy --live 9000 3000    live mode, dev server on :9000, proxy on :3000
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::config::{loader, ConfigError, ConfigOverrides, ProxyConfig};

#[derive(Debug, Parser)]
#[command(name = "dev-proxy", version)]
#[command(about = "Single-port front door for a web app: /v1/* to the API, everything else to a live dev server or a static bundle", long_about = None)]
pub struct Cli {
    /// Port to listen on [default: 8080]
    #[arg(value_name = "PORT")]
    pub port: Option<u16>,

    /// Forward non-API traffic to a front-end dev server on localhost:PORT
    #[arg(long, value_name = "PORT", num_args = 0..=1, default_missing_value = "8081")]
    pub live: Option<u16>,

    /// API upstream base URL [default: http://localhost:3001]
    #[arg(long, env = "DEV_PROXY_API_TARGET", value_name = "URL")]
    pub api: Option<String>,

    /// Directory with the compiled web bundle [default: build/web]
    #[arg(long, env = "DEV_PROXY_WEB_DIR", value_name = "DIR")]
    pub web_dir: Option<PathBuf>,

    /// Interface to bind [default: 0.0.0.0]
    #[arg(long, env = "DEV_PROXY_BIND", value_name = "HOST")]
    pub bind: Option<String>,

    /// TOML config file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds to wait for an upstream response head [default: 30]
    #[arg(long, value_name = "SECS")]
    pub upstream_timeout: Option<u64>,

    /// Expose Prometheus metrics on this address (e.g. 127.0.0.1:9100)
    #[arg(long, value_name = "ADDR")]
    pub metrics: Option<String>,

    /// Log level when RUST_LOG is unset [default: info]
    #[arg(long, env = "DEV_PROXY_LOG", value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            host: self.bind.clone(),
            live_port: self.live,
            api_target: self.api.clone(),
            web_dir: self.web_dir.clone(),
            upstream_timeout_secs: self.upstream_timeout,
            metrics_address: self.metrics.clone(),
            log_level: self.log_level.clone(),
        }
    }

    /// Merge defaults, the config file and the flags into a validated config.
    pub fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let overrides = self.overrides();
        loader::resolve_config(self.config.as_deref(), overrides)
    }
}
