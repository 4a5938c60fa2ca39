//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, dispatch)
//!     → [routing decides the target]
//!     → forward.rs (API / live front-end: request.rs reads the body,
//!                   headers.rs filters hop-by-hop headers both ways)
//!       or static_files.rs (file or SPA fallback)
//!     → response.rs (proxy-generated error pages)
//!     → Send to client
//! ```

pub mod forward;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use forward::{ForwardOutcome, Forwarder, UpstreamUnreachable};
pub use request::{BodyError, InboundRequest};
pub use server::{AppState, HttpServer};
pub use static_files::{Resolution, StaticResolver};
