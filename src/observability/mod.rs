//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events, pretty or JSON)
//!     → metrics.rs (request, reload and engine failure counters)
//!
//! Consumers:
//!     → stdout log collection
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span (see http::request)
//! - Metric updates go through the `metrics` facade; without a recorder
//!   installed they are no-ops

pub mod logging;
pub mod metrics;
