//! Local development front door.
//!
//! One port for the browser; `/v1/*` goes to the API server, everything else
//! to a live front-end dev server (live mode) or to a compiled bundle on disk
//! with single-page-application fallback (static mode).

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
