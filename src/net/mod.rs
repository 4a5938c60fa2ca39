//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig (host, port)
//!     → listener.rs (bind, classify bind failures)
//!     → Hand the bound socket to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bind failures are startup errors with their own exit code
//! - Connections are accepted by axum, one task per connection

pub mod listener;

pub use listener::{bind, ListenerError};
