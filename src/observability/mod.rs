//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher (one event per request):
//!     → logging.rs (tracing subscriber, console output)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Consumers:
//!     → Developer's terminal
//!     → Optional Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - Every request line carries its route tag (API / LIVE / STATIC)
//! - `RUST_LOG` overrides the configured level
//! - Metrics cost nothing when no exporter is installed

pub mod logging;
pub mod metrics;
