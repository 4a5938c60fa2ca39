//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Metrics exporter → Bind listener → Serve
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Trigger → server drops the listener → "Stopped." → exit 0
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and maps to an exit code
//! - No draining: in-flight requests are abandoned on shutdown

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run, StartupError};
