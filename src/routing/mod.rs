//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → matcher.rs (API prefix check)
//!     → router.rs (precedence: API, then live front-end, then static files)
//!     → Return: RouteTarget
//! ```
//!
//! # Design Decisions
//! - Router built once from the immutable config
//! - Pure: same path and config always give the same target
//! - The API prefix wins in every mode so the dev server never shadows it

pub mod matcher;
pub mod router;

pub use matcher::PathPrefixMatcher;
pub use router::{RouteTarget, Router};
