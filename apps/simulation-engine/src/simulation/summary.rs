//! Statistics summarizer.
//!
//! Turns a sorted [`Sample`] into the descriptive and risk statistics of a
//! run:
//! - Mean and population standard deviation
//! - Nearest-rank percentiles (5, 25, 50, 75, 95)
//! - Value at Risk at 5% as a currency amount
//! - Probability of profit and of a loss of 10% or more
//!
//! Percentiles use the nearest-rank rule `sample[floor(n * p)]` with no
//! interpolation. For `n = 100`, P5 is the value at index 5 (the sixth
//! smallest) and P95 the value at index 95.

use serde::{Deserialize, Serialize};

use super::config::SimulationConfig;
use super::sample::Sample;

/// Fraction of the investment below which a trial counts as a 10% loss.
pub const LOSS_10_THRESHOLD: f64 = 0.9;

/// Summary of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsSummary {
    /// Mean terminal portfolio value.
    pub mean: f64,
    /// Population standard deviation of terminal values.
    pub std_dev: f64,
    /// 5th percentile.
    pub percentile_5: f64,
    /// 25th percentile.
    pub percentile_25: f64,
    /// 50th percentile (median).
    pub percentile_50: f64,
    /// 75th percentile.
    pub percentile_75: f64,
    /// 95th percentile.
    pub percentile_95: f64,
    /// `initial_investment - percentile_5`; negative when P5 is a gain.
    pub value_at_risk_5: f64,
    /// `mean - initial_investment`.
    pub expected_return: f64,
    /// Fraction of trials ending strictly above the investment.
    pub probability_of_profit: f64,
    /// Fraction of trials ending strictly below 90% of the investment.
    pub probability_of_loss_10: f64,
    /// Starting asset price.
    pub current_price: f64,
    /// Shares bought with the initial investment.
    pub share_count: f64,
    /// Number of trials summarised.
    pub trial_count: usize,
}

/// Index of the nearest-rank percentile `p` in a sample of `n` values.
///
/// `floor(n * p)`, clamped to `n - 1`.
#[must_use]
pub fn percentile_index(n: usize, p: f64) -> usize {
    ((n as f64 * p) as usize).min(n.saturating_sub(1))
}

/// Nearest-rank percentile of an ascending sample; `None` when empty.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    Some(sorted[percentile_index(sorted.len(), p)])
}

/// Summarise a sorted sample.
///
/// An empty sample yields NaN statistics; the engine never produces one
/// because `trial_count` is validated positive.
#[must_use]
pub fn summarize(sample: &Sample, config: &SimulationConfig) -> ResultsSummary {
    let values = sample.values();
    let n = values.len() as f64;
    let investment = config.initial_investment;

    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let pct = |p: f64| percentile(values, p).unwrap_or(f64::NAN);
    let percentile_5 = pct(0.05);

    let profitable = values.iter().filter(|v| **v > investment).count();
    let loss_cutoff = investment * LOSS_10_THRESHOLD;
    let lost_10 = values.iter().filter(|v| **v < loss_cutoff).count();

    ResultsSummary {
        mean,
        std_dev,
        percentile_5,
        percentile_25: pct(0.25),
        percentile_50: pct(0.50),
        percentile_75: pct(0.75),
        percentile_95: pct(0.95),
        value_at_risk_5: investment - percentile_5,
        expected_return: mean - investment,
        probability_of_profit: profitable as f64 / n,
        probability_of_loss_10: lost_10 as f64 / n,
        current_price: config.current_price,
        share_count: config.share_count(),
        trial_count: values.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(investment: f64) -> SimulationConfig {
        SimulationConfig {
            initial_investment: investment,
            horizon_days: 1,
            trial_count: 1,
            mean_daily_return: 0.0,
            daily_volatility: 0.0,
            current_price: 100.0,
        }
    }

    fn sample(values: Vec<f64>) -> Sample {
        let n = values.len();
        Sample::collect(values, n).unwrap()
    }

    #[test]
    fn test_percentile_index_nearest_rank() {
        assert_eq!(percentile_index(100, 0.05), 5);
        assert_eq!(percentile_index(100, 0.25), 25);
        assert_eq!(percentile_index(100, 0.50), 50);
        assert_eq!(percentile_index(100, 0.95), 95);
        assert_eq!(percentile_index(100, 1.0), 99);
        assert_eq!(percentile_index(3, 0.95), 2);
        assert_eq!(percentile_index(1, 0.5), 0);
        assert_eq!(percentile_index(10_000, 0.05), 500);
    }

    #[test]
    fn test_percentiles_on_ranked_sample() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let summary = summarize(&sample(values), &config(50.0));
        assert_eq!(summary.percentile_5, 5.0);
        assert_eq!(summary.percentile_25, 25.0);
        assert_eq!(summary.percentile_50, 50.0);
        assert_eq!(summary.percentile_75, 75.0);
        assert_eq!(summary.percentile_95, 95.0);
    }

    #[test]
    fn test_percentile_does_not_interpolate() {
        // n = 10: P25 index floor(2.5) = 2, P95 index floor(9.5) = 9
        let values: Vec<f64> = (1..=10).map(|v| f64::from(v) * 10.0).collect();
        let summary = summarize(&sample(values), &config(50.0));
        assert_eq!(summary.percentile_25, 30.0);
        assert_eq!(summary.percentile_50, 60.0);
        assert_eq!(summary.percentile_95, 100.0);
    }

    #[test]
    fn test_mean_and_population_std() {
        let summary = summarize(&sample(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), &config(5.0));
        assert_eq!(summary.mean, 5.0);
        // population variance = 4, sample variance would be 32/7
        assert_eq!(summary.std_dev, 2.0);
        assert_eq!(summary.expected_return, 0.0);
    }

    #[test]
    fn test_var_and_probabilities() {
        let values = vec![80.0, 89.0, 90.0, 95.0, 100.0, 100.0, 105.0, 110.0, 120.0, 130.0];
        let summary = summarize(&sample(values), &config(100.0));

        // P5 index floor(0.5) = 0
        assert_eq!(summary.percentile_5, 80.0);
        assert_eq!(summary.value_at_risk_5, 20.0);
        // strictly above 100: 105, 110, 120, 130
        assert_eq!(summary.probability_of_profit, 0.4);
        // strictly below 90: 80, 89 (90 itself excluded)
        assert_eq!(summary.probability_of_loss_10, 0.2);
    }

    #[test]
    fn test_negative_var_when_all_gain() {
        let summary = summarize(&sample(vec![110.0, 120.0, 130.0]), &config(100.0));
        assert_eq!(summary.value_at_risk_5, -10.0);
        assert_eq!(summary.probability_of_profit, 1.0);
        assert_eq!(summary.probability_of_loss_10, 0.0);
    }

    #[test]
    fn test_echoed_fields() {
        let summary = summarize(&sample(vec![100.0; 4]), &config(100_000.0));
        assert_eq!(summary.current_price, 100.0);
        assert_eq!(summary.share_count, 1000.0);
        assert_eq!(summary.trial_count, 4);
        assert_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn test_percentile_helper_empty() {
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(percentile(&[1.0, 2.0], 0.5), Some(2.0));
    }
}
