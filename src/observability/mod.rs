//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!         → error_log.rs (ERROR events, served by GET /api/errors)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//!     → Control API clients
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Metrics are cheap (atomic increments)

pub mod error_log;
pub mod logging;
pub mod metrics;

pub use error_log::{ErrorLog, ErrorRecord, RecentErrors};
