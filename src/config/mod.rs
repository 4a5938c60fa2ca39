//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → environment / command-line overrides (loader.rs, fed by cli.rs)
//!     → validation.rs (semantic checks, all errors collected)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc with the router, forwarder and static resolver
//! ```
//!
//! # Design Decisions
//! - Config is built once at startup and never mutated afterwards
//! - All fields have defaults so the proxy runs with no arguments at all
//! - Validation separates syntactic (serde, URL parsing) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigOverrides};
pub use schema::{
    InvalidUpstream, LimitsConfig, ListenerConfig, Mode, ObservabilityConfig, ProxyConfig,
    TimeoutConfig, UpstreamTarget,
};
pub use validation::ValidationError;
