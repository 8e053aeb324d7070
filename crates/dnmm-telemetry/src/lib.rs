//! Ambient observability stack (§10.2, §10.3): `tracing`-based structured
//! logging plus a Prometheus-backed `dnmm_core::Observer` implementation.
//! Nothing in this crate feeds back into pricing — it only watches.

pub mod error;
pub mod logging;
pub mod metrics;
pub mod observer;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use observer::TracingMetricsObserver;
