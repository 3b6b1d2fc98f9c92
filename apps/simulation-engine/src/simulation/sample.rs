//! Sample aggregator: the sorted set of terminal portfolio values.

use serde::Serialize;

use crate::error::SimulationError;

/// Terminal portfolio values of one run, sorted ascending.
///
/// Immutable once built. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    /// Aggregate `values` into a sorted sample.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::SampleSizeMismatch`] unless exactly
    /// `expected` values were produced.
    pub fn collect(mut values: Vec<f64>, expected: usize) -> Result<Self, SimulationError> {
        if values.len() != expected {
            return Err(SimulationError::SampleSizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        values.sort_unstable_by(f64::total_cmp);
        Ok(Self { values })
    }

    /// All values, ascending.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the sample holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The first `n` values (the smallest), for callers that chart a subset.
    #[must_use]
    pub fn head(&self, n: usize) -> &[f64] {
        &self.values[..n.min(self.values.len())]
    }

    /// Smallest value.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// Largest value.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Consume the sample, returning the sorted values.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}
