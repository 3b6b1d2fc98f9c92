//! Uniform random sources for the path generator.
//!
//! The engine never touches a global generator. Every draw goes through a
//! [`UniformSource`], so tests can script exact draws and parallel workers can
//! each own an independent stream.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::SimulationError;

/// Largest `f64` strictly below 1.0.
const ONE_MINUS_ULP: f64 = 1.0 - f64::EPSILON / 2.0;

/// A capability producing uniform variates, nominally in `[0, 1)`.
///
/// Raw draws are clamped into the open interval `(0, 1)` by [`open_unit`]
/// before use, so implementations may return `0.0`.
pub trait UniformSource {
    /// Produce the next uniform variate.
    fn next_uniform(&mut self) -> f64;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// Clamp a raw draw into the open unit interval.
///
/// `0.0` (and anything below it) becomes `f64::MIN_POSITIVE` so `ln(u)` stays
/// finite; anything at or above `1.0` becomes the largest value below one.
///
/// # Errors
///
/// Returns [`SimulationError::NumericDegeneracy`] for NaN draws.
pub fn open_unit(u: f64) -> Result<f64, SimulationError> {
    if u.is_nan() {
        return Err(SimulationError::NumericDegeneracy(
            "uniform source produced NaN".to_string(),
        ));
    }
    if u <= 0.0 {
        Ok(f64::MIN_POSITIVE)
    } else if u >= 1.0 {
        Ok(ONE_MINUS_ULP)
    } else {
        Ok(u)
    }
}

/// Uniform source backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Consume the source, returning the generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<ChaCha8Rng> {
    /// Seeded ChaCha8 source.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seeded ChaCha8 source on an independent stream.
    ///
    /// Streams sharing a seed never overlap, which lets each worker chunk of a
    /// seeded run draw from its own sequence regardless of scheduling.
    #[must_use]
    pub fn seeded_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self::new(rng)
    }
}

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Scripted source that replays a fixed sequence of draws, cycling at the end.
///
/// An empty script yields NaN, which the path generator rejects as
/// [`SimulationError::NumericDegeneracy`].
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    draws: Vec<f64>,
    position: usize,
}

impl SequenceSource {
    /// Create a source replaying `draws` in order.
    #[must_use]
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            position: 0,
        }
    }

    /// Total number of draws taken so far.
    #[must_use]
    pub const fn draws_taken(&self) -> usize {
        self.position
    }
}

impl UniformSource for SequenceSource {
    fn next_uniform(&mut self) -> f64 {
        if self.draws.is_empty() {
            return f64::NAN;
        }
        let value = self.draws[self.position % self.draws.len()];
        self.position += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_unit_clamps_zero() {
        assert_eq!(open_unit(0.0).unwrap(), f64::MIN_POSITIVE);
        assert_eq!(open_unit(-0.5).unwrap(), f64::MIN_POSITIVE);
        assert!(open_unit(0.0).unwrap().ln().is_finite());
    }

    #[test]
    fn test_open_unit_clamps_one() {
        let clamped = open_unit(1.0).unwrap();
        assert!(clamped < 1.0);
        assert_eq!(clamped, ONE_MINUS_ULP);
    }

    #[test]
    fn test_open_unit_passes_interior() {
        assert_eq!(open_unit(0.25).unwrap(), 0.25);
    }

    #[test]
    fn test_open_unit_rejects_nan() {
        let err = open_unit(f64::NAN).unwrap_err();
        assert!(matches!(err, SimulationError::NumericDegeneracy(_)));
    }

    #[test]
    fn test_sequence_source_cycles() {
        let mut source = SequenceSource::new(vec![0.1, 0.2, 0.3]);
        let drawn: Vec<f64> = (0..5).map(|_| source.next_uniform()).collect();
        assert_eq!(drawn, vec![0.1, 0.2, 0.3, 0.1, 0.2]);
        assert_eq!(source.draws_taken(), 5);
    }

    #[test]
    fn test_empty_sequence_yields_nan() {
        let mut source = SequenceSource::default();
        assert!(source.next_uniform().is_nan());
    }

    #[test]
    fn test_seeded_source_reproducible() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        for _ in 0..100 {
            let x = a.next_uniform();
            assert_eq!(x, b.next_uniform());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_streams_differ() {
        let mut a = RngSource::seeded_stream(7, 0);
        let mut b = RngSource::seeded_stream(7, 1);
        let xs: Vec<f64> = (0..8).map(|_| a.next_uniform()).collect();
        let ys: Vec<f64> = (0..8).map(|_| b.next_uniform()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_mut_ref_is_source() {
        fn take_two(mut source: impl UniformSource) -> (f64, f64) {
            (source.next_uniform(), source.next_uniform())
        }

        let mut source = SequenceSource::new(vec![0.4, 0.6]);
        assert_eq!(take_two(&mut source), (0.4, 0.6));
        assert_eq!(source.draws_taken(), 2);
    }
}
