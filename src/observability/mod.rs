//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request produces:
//!     → logging.rs (structured log events, request id in the span)
//!     → metrics.rs (counter + latency histogram per outcome)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::{init_metrics, record_request, Outcome};
