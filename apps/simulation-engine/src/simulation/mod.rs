//! Monte Carlo simulation of a single asset's terminal portfolio value.
//!
//! A run flows through three stages:
//!
//! - **Path generator** ([`path`]): one terminal value per trial from a
//!   discrete-time random walk driven by Box–Muller normals
//! - **Sample aggregator** ([`sample`]): exactly `trial_count` values, sorted
//! - **Statistics summarizer** ([`summary`]): mean, std dev, nearest-rank
//!   percentiles, VaR and profit/loss probabilities
//!
//! [`RiskLevel`] buckets a summary by its probability of profit.
//!
//! # Example
//!
//! ```
//! use simulation_engine::simulation::{SimulationConfig, run_simulation};
//!
//! let config = SimulationConfig {
//!     initial_investment: 100_000.0,
//!     horizon_days: 1,
//!     trial_count: 3,
//!     mean_daily_return: 0.0,
//!     daily_volatility: 0.0,
//!     current_price: 100.0,
//! };
//!
//! let summary = run_simulation(&config).unwrap();
//! assert_eq!(summary.mean, 100_000.0);
//! assert_eq!(summary.value_at_risk_5, 0.0);
//! ```

mod config;
mod engine;
pub mod path;
pub mod random;
mod risk;
pub mod sample;
pub mod summary;

pub use config::{SimulationConfig, SimulationConfigBuilder};
pub use engine::{
    EngineConfig, SimulationEngine, SimulationOutcome, run_simulation, run_simulation_with_source,
};
pub use path::{PathGenerator, box_muller};
pub use random::{RngSource, SequenceSource, UniformSource};
pub use risk::{
    CAUTION_STOP_LOSS, CAUTION_THRESHOLD, LOW_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD,
    PROCEED_STOP_LOSS, PROCEED_THRESHOLD, Recommendation, RiskLevel,
};
pub use sample::Sample;
pub use summary::{ResultsSummary, percentile, percentile_index, summarize};
