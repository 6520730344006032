//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! listener cycle produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counters, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout, remote)
//!     → Whatever metrics recorder the host installs
//! ```

pub mod logging;
pub mod metrics;
