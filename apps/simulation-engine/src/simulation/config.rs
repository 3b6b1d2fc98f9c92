//! Simulation parameters and their validation.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Parameters of one Monte Carlo run.
///
/// The engine only ever reads a config; it is validated in full before the
/// first trial starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Amount invested at `current_price` (currency units, positive).
    pub initial_investment: f64,
    /// Number of daily steps per price path.
    pub horizon_days: u32,
    /// Number of simulated paths (positive).
    pub trial_count: usize,
    /// Drift of the daily return.
    pub mean_daily_return: f64,
    /// Standard deviation of the daily return (non-negative).
    pub daily_volatility: f64,
    /// Starting asset price (positive).
    pub current_price: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_investment: 100_000.0,
            horizon_days: 30,
            trial_count: 10_000,
            mean_daily_return: 0.0006,
            daily_volatility: 0.012,
            current_price: 596.56,
        }
    }
}

impl SimulationConfig {
    /// Create a builder seeded with the default parameters.
    #[must_use]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of shares bought with the initial investment.
    #[must_use]
    pub fn share_count(&self) -> f64 {
        self.initial_investment / self.current_price
    }

    /// Validate every field.
    ///
    /// `horizon_days` is unsigned, so a negative horizon cannot be expressed.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.initial_investment.is_finite() || self.initial_investment <= 0.0 {
            return Err(SimulationError::invalid_config(
                "initial_investment",
                format!("must be positive, got {}", self.initial_investment),
            ));
        }
        if self.trial_count == 0 {
            return Err(SimulationError::invalid_config(
                "trial_count",
                "must be positive, got 0",
            ));
        }
        if !self.current_price.is_finite() || self.current_price <= 0.0 {
            return Err(SimulationError::invalid_config(
                "current_price",
                format!("must be positive, got {}", self.current_price),
            ));
        }
        if !self.daily_volatility.is_finite() || self.daily_volatility < 0.0 {
            return Err(SimulationError::invalid_config(
                "daily_volatility",
                format!("must be non-negative, got {}", self.daily_volatility),
            ));
        }
        if !self.mean_daily_return.is_finite() {
            return Err(SimulationError::invalid_config(
                "mean_daily_return",
                format!("must be finite, got {}", self.mean_daily_return),
            ));
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Debug, Default)]
pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    /// Set the initial investment.
    #[must_use]
    pub const fn initial_investment(mut self, amount: f64) -> Self {
        self.config.initial_investment = amount;
        self
    }

    /// Set the horizon in days.
    #[must_use]
    pub const fn horizon_days(mut self, days: u32) -> Self {
        self.config.horizon_days = days;
        self
    }

    /// Set the number of trials.
    #[must_use]
    pub const fn trial_count(mut self, trials: usize) -> Self {
        self.config.trial_count = trials;
        self
    }

    /// Set the mean daily return.
    #[must_use]
    pub const fn mean_daily_return(mut self, mean: f64) -> Self {
        self.config.mean_daily_return = mean;
        self
    }

    /// Set the daily volatility.
    #[must_use]
    pub const fn daily_volatility(mut self, volatility: f64) -> Self {
        self.config.daily_volatility = volatility;
        self
    }

    /// Set the current price.
    #[must_use]
    pub const fn current_price(mut self, price: f64) -> Self {
        self.config.current_price = price;
        self
    }

    /// Validate and return the config.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] if any field is out of domain.
    pub fn build(self) -> Result<SimulationConfig, SimulationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_default_values() {
        let config = SimulationConfig::default();
        assert_eq!(config.initial_investment, 100_000.0);
        assert_eq!(config.horizon_days, 30);
        assert_eq!(config.trial_count, 10_000);
        assert_eq!(config.mean_daily_return, 0.0006);
        assert_eq!(config.daily_volatility, 0.012);
        assert_eq!(config.current_price, 596.56);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_share_count() {
        let config = SimulationConfig::builder()
            .initial_investment(100_000.0)
            .current_price(100.0)
            .build()
            .unwrap();
        assert_eq!(config.share_count(), 1000.0);
    }

    #[test_case(0.0, 10, 100.0, 0.01, "initial_investment" ; "zero investment")]
    #[test_case(-5.0, 10, 100.0, 0.01, "initial_investment" ; "negative investment")]
    #[test_case(f64::NAN, 10, 100.0, 0.01, "initial_investment" ; "nan investment")]
    #[test_case(1000.0, 0, 100.0, 0.01, "trial_count" ; "zero trials")]
    #[test_case(1000.0, 10, 0.0, 0.01, "current_price" ; "zero price")]
    #[test_case(1000.0, 10, -1.0, 0.01, "current_price" ; "negative price")]
    #[test_case(1000.0, 10, 100.0, -0.01, "daily_volatility" ; "negative volatility")]
    #[test_case(1000.0, 10, 100.0, f64::INFINITY, "daily_volatility" ; "infinite volatility")]
    fn test_validation_rejects(
        investment: f64,
        trials: usize,
        price: f64,
        volatility: f64,
        expected_field: &str,
    ) {
        let result = SimulationConfig::builder()
            .initial_investment(investment)
            .trial_count(trials)
            .current_price(price)
            .daily_volatility(volatility)
            .build();

        match result {
            Err(SimulationError::InvalidConfig { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected InvalidConfig for {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_volatility_and_horizon_are_valid() {
        let config = SimulationConfig::builder()
            .horizon_days(0)
            .daily_volatility(0.0)
            .mean_daily_return(-0.01)
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_nan_mean_rejected() {
        let err = SimulationConfig::builder()
            .mean_daily_return(f64::NAN)
            .build()
            .unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidConfig);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"trial_count": 500, "current_price": 42.0}"#).unwrap();
        assert_eq!(config.trial_count, 500);
        assert_eq!(config.current_price, 42.0);
        assert_eq!(config.horizon_days, 30);
    }
}
