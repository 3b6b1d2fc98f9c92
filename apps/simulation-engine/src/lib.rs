// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value
    )
)]

//! Simulation Engine - Monte Carlo Risk Core
//!
//! Estimates the distribution of a single asset's future portfolio value by
//! simulating randomized price paths, then derives risk statistics from the
//! resulting sample.
//!
//! # Modules
//!
//! - `simulation`: Path generator, sample aggregator, statistics summarizer,
//!   risk classification and the engine that ties them together
//! - `config`: YAML configuration loading with environment interpolation
//! - `observability`: Tracing subscriber setup and metrics recording
//! - `report`: Text rendering of a run summary
//! - `error`: Error taxonomy shared by every stage
//!
//! # Example
//!
//! ```
//! use simulation_engine::{EngineConfig, RiskLevel, SimulationConfig, SimulationEngine};
//!
//! let engine = SimulationEngine::new(EngineConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! });
//! let config = SimulationConfig {
//!     trial_count: 1_000,
//!     ..Default::default()
//! };
//!
//! let outcome = engine.run(&config).unwrap();
//! let summary = &outcome.summary;
//! assert!(summary.percentile_5 <= summary.percentile_95);
//! let _risk = RiskLevel::from_summary(summary);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and validation.
pub mod config;

/// Error types.
pub mod error;

/// Logging and metrics.
pub mod observability;

/// Text report rendering.
pub mod report;

/// Monte Carlo simulation core.
pub mod simulation;

pub use error::{ErrorCode, SimulationError};
pub use simulation::{
    EngineConfig, Recommendation, ResultsSummary, RiskLevel, Sample, SimulationConfig,
    SimulationEngine, SimulationOutcome, UniformSource, run_simulation,
    run_simulation_with_source,
};
