//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers / forwarder
//!     → logging.rs (tracing subscriber, structured events)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
