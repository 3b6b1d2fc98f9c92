//! Simulation engine: runs the trials and summarises them.
//!
//! Trials are split into fixed-size chunks. Chunk `k` draws from its own
//! ChaCha8 stream `(seed, k)`, so a seeded run gives bit-identical output
//! whether chunks execute sequentially or on any number of rayon workers.
//! Results depend only on the seed and `chunk_size`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, error, info, span, warn};

use super::config::SimulationConfig;
use super::path::PathGenerator;
use super::random::{RngSource, UniformSource};
use super::sample::Sample;
use super::summary::{ResultsSummary, summarize};
use crate::error::SimulationError;
use crate::observability::record_simulation_run;

/// Execution settings for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for reproducible runs (None = fresh entropy per run).
    pub seed: Option<u64>,
    /// Maximum worker threads (0 = rayon global pool).
    pub max_threads: usize,
    /// Trial counts below this run on the calling thread.
    pub min_parallel_trials: usize,
    /// Trials per chunk (one random stream per chunk).
    pub chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_threads: 0,
            min_parallel_trials: 2048,
            chunk_size: 1024,
        }
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    /// Summary statistics over the full sample.
    pub summary: ResultsSummary,
    /// The sorted terminal values.
    pub sample: Sample,
    /// Seed the run used, when it drew from the engine's own streams.
    pub seed: Option<u64>,
}

/// Monte Carlo engine.
///
/// Holds no state between runs apart from its settings and cancellation
/// token. A cancelled token stays cancelled; call
/// [`SimulationEngine::renew_cancellation`] before the next run.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    config: EngineConfig,
    cancel: CancellationToken,
}

impl SimulationEngine {
    /// Create an engine with the given settings.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Engine settings.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Token that cancels in-flight runs of this engine.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Install a fresh token and return it.
    pub fn renew_cancellation(&mut self) -> CancellationToken {
        self.cancel = CancellationToken::new();
        self.cancel.clone()
    }

    /// Run a full simulation.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::InvalidConfig`] before any trial runs
    /// - [`SimulationError::Cancelled`] if the token fires mid-run
    /// - [`SimulationError::WorkerFailure`] if the worker pool cannot be built
    pub fn run(&self, config: &SimulationConfig) -> Result<SimulationOutcome, SimulationError> {
        config.validate()?;
        if self.config.chunk_size == 0 {
            return Err(SimulationError::invalid_config(
                "chunk_size",
                "must be positive, got 0",
            ));
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let span = span!(
            Level::INFO,
            "simulation.run",
            trials = config.trial_count,
            horizon_days = config.horizon_days,
            seed
        );
        let _enter = span.enter();

        info!(
            trials = config.trial_count,
            horizon_days = config.horizon_days,
            mean_daily_return = config.mean_daily_return,
            daily_volatility = config.daily_volatility,
            "Running Monte Carlo simulation"
        );

        let start = Instant::now();
        let result = self
            .generate(config, seed)
            .and_then(|values| Sample::collect(values, config.trial_count));
        let elapsed = start.elapsed();

        match result {
            Ok(sample) => {
                let summary = summarize(&sample, config);
                record_simulation_run("COMPLETED", config.trial_count, elapsed.as_secs_f64());
                info!(
                    mean = summary.mean,
                    std_dev = summary.std_dev,
                    value_at_risk_5 = summary.value_at_risk_5,
                    probability_of_profit = summary.probability_of_profit,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Monte Carlo simulation complete"
                );
                Ok(SimulationOutcome {
                    summary,
                    sample,
                    seed: Some(seed),
                })
            }
            Err(err) => {
                record_simulation_run(err.code().reason(), 0, elapsed.as_secs_f64());
                if let SimulationError::Cancelled { completed, requested } = err {
                    warn!(completed, requested, "Monte Carlo simulation cancelled");
                } else {
                    error!(error = %err, "Monte Carlo simulation failed");
                }
                Err(err)
            }
        }
    }

    /// Run on tokio's blocking pool so async callers can await the result.
    ///
    /// Dropping the future does not stop the run; cancel through
    /// [`SimulationEngine::cancellation_token`].
    ///
    /// # Errors
    ///
    /// As [`SimulationEngine::run`], plus [`SimulationError::WorkerFailure`]
    /// if the blocking task panics.
    pub async fn run_async(
        &self,
        config: SimulationConfig,
    ) -> Result<SimulationOutcome, SimulationError> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.run(&config))
            .await
            .map_err(|e| SimulationError::WorkerFailure(e.to_string()))?
    }

    /// Produce exactly `trial_count` terminal values, chunk order preserved.
    fn generate(&self, config: &SimulationConfig, seed: u64) -> Result<Vec<f64>, SimulationError> {
        let generator = PathGenerator::new(config);
        let trials = config.trial_count;
        let chunk_size = self.config.chunk_size;
        let chunk_count = trials.div_ceil(chunk_size);
        let completed = AtomicUsize::new(0);

        let run_chunk = |index: usize| -> Result<Vec<f64>, SimulationError> {
            let len = chunk_size.min(trials - index * chunk_size);
            let mut source = RngSource::seeded_stream(seed, index as u64);
            let mut values = Vec::with_capacity(len);
            for _ in 0..len {
                if self.cancel.is_cancelled() {
                    return Err(SimulationError::Cancelled {
                        completed: completed.load(Ordering::Relaxed),
                        requested: trials,
                    });
                }
                values.push(generator.terminal_value(&mut source)?);
                completed.fetch_add(1, Ordering::Relaxed);
            }
            debug!(
                chunk = index,
                completed = completed.load(Ordering::Relaxed),
                total = trials,
                "Monte Carlo progress"
            );
            Ok(values)
        };

        let chunks = if trials >= self.config.min_parallel_trials && chunk_count > 1 {
            self.run_parallel(chunk_count, &run_chunk)?
        } else {
            (0..chunk_count)
                .map(run_chunk)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(chunks.into_iter().flatten().collect())
    }

    /// Run chunks on rayon, in a dedicated pool when `max_threads` is set.
    fn run_parallel<F>(
        &self,
        chunk_count: usize,
        run_chunk: &F,
    ) -> Result<Vec<Vec<f64>>, SimulationError>
    where
        F: Fn(usize) -> Result<Vec<f64>, SimulationError> + Sync,
    {
        let collect = || {
            (0..chunk_count)
                .into_par_iter()
                .map(run_chunk)
                .collect::<Result<Vec<_>, _>>()
        };

        if self.config.max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.max_threads)
                .build()
                .map_err(|e| SimulationError::WorkerFailure(e.to_string()))?;
            pool.install(collect)
        } else {
            collect()
        }
    }
}

/// Run a simulation with the default engine and return its summary.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidConfig`] for out-of-domain parameters.
pub fn run_simulation(config: &SimulationConfig) -> Result<ResultsSummary, SimulationError> {
    SimulationEngine::default()
        .run(config)
        .map(|outcome| outcome.summary)
}

/// Run a simulation sequentially over an injected uniform source.
///
/// Trials consume the source in order, two draws per simulated day, so a
/// fixed script of draws gives bit-reproducible output.
///
/// # Errors
///
/// - [`SimulationError::InvalidConfig`] before any draw is taken
/// - [`SimulationError::NumericDegeneracy`] if the source yields NaN
pub fn run_simulation_with_source<S: UniformSource + ?Sized>(
    config: &SimulationConfig,
    source: &mut S,
) -> Result<SimulationOutcome, SimulationError> {
    config.validate()?;

    let generator = PathGenerator::new(config);
    let values = (0..config.trial_count)
        .map(|_| generator.terminal_value(source))
        .collect::<Result<Vec<_>, _>>()?;
    let sample = Sample::collect(values, config.trial_count)?;
    let summary = summarize(&sample, config);

    debug!(
        trials = config.trial_count,
        mean = summary.mean,
        "Simulation over injected source complete"
    );

    Ok(SimulationOutcome {
        summary,
        sample,
        seed: None,
    })
}
