//! Path generator: one terminal portfolio value per trial.
//!
//! Each trial walks the price forward `horizon_days` times, applying a daily
//! return of `mean + volatility * z` where `z` is a standard normal variate
//! produced by the Box–Muller transform.

use std::f64::consts::PI;

use super::config::SimulationConfig;
use super::random::{UniformSource, open_unit};
use crate::error::SimulationError;

/// Draw one standard normal variate via the Box–Muller transform.
///
/// Consumes exactly two uniforms, `u1` then `u2`, and returns
/// `sqrt(-2 ln u1) * cos(2π u2)`.
///
/// # Errors
///
/// Returns [`SimulationError::NumericDegeneracy`] if either draw is NaN.
pub fn box_muller<S: UniformSource + ?Sized>(source: &mut S) -> Result<f64, SimulationError> {
    let u1 = open_unit(source.next_uniform())?;
    let u2 = open_unit(source.next_uniform())?;
    Ok((-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos())
}

/// Generates terminal portfolio values for a fixed config.
#[derive(Debug, Clone, Copy)]
pub struct PathGenerator {
    initial_investment: f64,
    current_price: f64,
    share_count: f64,
    horizon_days: u32,
    mean_daily_return: f64,
    daily_volatility: f64,
}

impl PathGenerator {
    /// Create a generator for `config`. The config should already be validated.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            initial_investment: config.initial_investment,
            current_price: config.current_price,
            share_count: config.share_count(),
            horizon_days: config.horizon_days,
            mean_daily_return: config.mean_daily_return,
            daily_volatility: config.daily_volatility,
        }
    }

    /// Walk one price path from `current_price` and return the terminal price.
    ///
    /// # Errors
    ///
    /// Propagates [`SimulationError::NumericDegeneracy`] from the source.
    // Unfused multiply-add: the sample must match the plain update bit for bit.
    #[allow(clippy::suboptimal_flops)]
    pub fn terminal_price<S: UniformSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<f64, SimulationError> {
        let mut price = self.current_price;
        for _ in 0..self.horizon_days {
            let z = box_muller(source)?;
            let daily_return = self.mean_daily_return + self.daily_volatility * z;
            price *= 1.0 + daily_return;
        }
        Ok(price)
    }

    /// Simulate one path and return the terminal portfolio value,
    /// `share_count * terminal_price`.
    ///
    /// A zero horizon takes no draws and returns `initial_investment` exactly.
    ///
    /// # Errors
    ///
    /// Propagates [`SimulationError::NumericDegeneracy`] from the source.
    pub fn terminal_value<S: UniformSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<f64, SimulationError> {
        if self.horizon_days == 0 {
            return Ok(self.initial_investment);
        }
        Ok(self.share_count * self.terminal_price(source)?)
    }
}
