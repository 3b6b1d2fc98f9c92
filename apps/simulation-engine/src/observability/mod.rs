//! Observability for the simulation engine: structured logging and metrics.
//!
//! Metrics go through the `metrics` facade. No exporter is installed, so
//! recording is a no-op unless the host process installs a recorder.

mod logging;
mod metrics;

pub use logging::{LoggingError, init_logging};
pub use metrics::{record_simulation_run, record_validation_failure};
