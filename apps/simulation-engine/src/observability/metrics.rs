//! Metrics for simulation runs.
//!
//! # Example
//!
//! ```ignore
//! use simulation_engine::observability::record_simulation_run;
//!
//! record_simulation_run("COMPLETED", 10_000, 0.42);
//! ```

use metrics::{counter, histogram};

/// Record the outcome of one simulation run.
///
/// # Arguments
///
/// * `status` - `COMPLETED` or the error code reason (e.g. `CANCELLED`)
/// * `trials` - Trials summarised (0 for failed runs)
/// * `duration_seconds` - Wall time of the run
pub fn record_simulation_run(status: &str, trials: usize, duration_seconds: f64) {
    counter!("simulation_runs_total", "status" => status.to_string()).increment(1);
    counter!("simulation_trials_total").increment(trials as u64);
    histogram!("simulation_run_duration_seconds", "status" => status.to_string())
        .record(duration_seconds);
}

/// Record a configuration rejected at load time.
pub fn record_validation_failure(field: &str) {
    counter!("simulation_config_rejections_total", "field" => field.to_string()).increment(1);
}
