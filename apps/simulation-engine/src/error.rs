//! Error types for the simulation engine.
//!
//! Every failure is total: a run either produces a complete summary over
//! exactly `trial_count` trials or fails before returning anything.
//!
//! | Code | Raised when |
//! |------|-------------|
//! | `INVALID_CONFIG` | A simulation parameter is outside its domain |
//! | `NUMERIC_DEGENERACY` | The uniform source cannot produce a usable draw |
//! | `SAMPLE_SIZE_MISMATCH` | The aggregator collected the wrong number of values |
//! | `CANCELLED` | The caller cancelled the run |
//! | `WORKER_FAILURE` | The worker pool could not be built or a worker task died |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes for simulation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Caller supplied out-of-domain parameters.
    InvalidConfig,
    /// Unrecoverable arithmetic condition.
    NumericDegeneracy,
    /// Aggregated sample length differs from the trial count.
    SampleSizeMismatch,
    /// Run interrupted by the caller.
    Cancelled,
    /// Worker pool or blocking task failure.
    WorkerFailure,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::NumericDegeneracy => "NUMERIC_DEGENERACY",
            Self::SampleSizeMismatch => "SAMPLE_SIZE_MISMATCH",
            Self::Cancelled => "CANCELLED",
            Self::WorkerFailure => "WORKER_FAILURE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors returned by the simulation engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// A configuration field failed validation.
    #[error("invalid simulation config: {field} {reason}")]
    InvalidConfig {
        /// Offending field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The random source produced an unusable value.
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    /// The aggregator did not receive exactly `expected` values.
    #[error("sample size mismatch: expected {expected} values, got {actual}")]
    SampleSizeMismatch {
        /// Requested trial count.
        expected: usize,
        /// Values actually collected.
        actual: usize,
    },

    /// The run was cancelled before all trials completed.
    #[error("simulation cancelled after {completed} of {requested} trials")]
    Cancelled {
        /// Trials finished before the cancellation was observed.
        completed: usize,
        /// Requested trial count.
        requested: usize,
    },

    /// The rayon pool could not be built or the blocking task panicked.
    #[error("simulation worker failed: {0}")]
    WorkerFailure(String),
}

impl SimulationError {
    /// Create an invalid-config error.
    #[must_use]
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            Self::NumericDegeneracy(_) => ErrorCode::NumericDegeneracy,
            Self::SampleSizeMismatch { .. } => ErrorCode::SampleSizeMismatch,
            Self::Cancelled { .. } => ErrorCode::Cancelled,
            Self::WorkerFailure(_) => ErrorCode::WorkerFailure,
        }
    }

    /// Whether rerunning the same request can succeed.
    ///
    /// Only a cancelled run is worth repeating; every other failure is a
    /// property of the input or the environment.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
