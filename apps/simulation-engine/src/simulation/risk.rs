//! Risk classification and investment recommendation from the probability
//! of profit.
//!
//! [`RiskLevel`] and [`Recommendation`] are separate rules with their own
//! thresholds; a summary at 0.62 is MEDIUM risk yet still a PROCEED.

use serde::{Deserialize, Serialize};

use super::summary::ResultsSummary;

/// Probability of profit at or above which a position is low risk.
pub const LOW_RISK_THRESHOLD: f64 = 0.65;

/// Probability of profit at or above which a position is medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.50;

/// Coarse risk bucket derived from a [`ResultsSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// `p >= 0.65`.
    Low,
    /// `0.50 <= p < 0.65`.
    Medium,
    /// `p < 0.50`.
    High,
}

impl RiskLevel {
    /// Classify a probability of profit.
    ///
    /// NaN falls through to [`RiskLevel::High`].
    #[must_use]
    pub fn classify(probability_of_profit: f64) -> Self {
        if probability_of_profit >= LOW_RISK_THRESHOLD {
            Self::Low
        } else if probability_of_profit >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Classify a run summary.
    #[must_use]
    pub fn from_summary(summary: &ResultsSummary) -> Self {
        Self::classify(summary.probability_of_profit)
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW RISK",
            Self::Medium => "MEDIUM RISK",
            Self::High => "HIGH RISK",
        }
    }

    /// Investor guidance for the bucket.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Low => "High probability of profit. Suitable for conservative investors.",
            Self::Medium => "Balanced risk-reward profile. Suitable for moderate investors.",
            Self::High => "Lower probability of profit. Only for aggressive investors.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&ResultsSummary> for RiskLevel {
    fn from(summary: &ResultsSummary) -> Self {
        Self::from_summary(summary)
    }
}

/// Probability of profit at or above which the recommendation is to proceed.
pub const PROCEED_THRESHOLD: f64 = 0.60;

/// Probability of profit at or above which the recommendation is caution.
pub const CAUTION_THRESHOLD: f64 = 0.45;

/// Loss fraction for a proceed stop-loss.
pub const PROCEED_STOP_LOSS: f64 = 0.08;

/// Loss fraction for the tighter cautious stop-loss.
pub const CAUTION_STOP_LOSS: f64 = 0.05;

/// Tiered action for a run, with its position-sizing and exit rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// `p >= 0.60`: full position, 8% stop-loss, take partial profits at P75.
    Proceed,
    /// `0.45 <= p < 0.60`: 50-75% position, 5% stop-loss, review at half horizon.
    Caution,
    /// `p < 0.45`: 25-50% position at most.
    Reconsider,
}

impl Recommendation {
    /// Classify a probability of profit. NaN falls through to
    /// [`Recommendation::Reconsider`].
    #[must_use]
    pub fn classify(probability_of_profit: f64) -> Self {
        if probability_of_profit >= PROCEED_THRESHOLD {
            Self::Proceed
        } else if probability_of_profit >= CAUTION_THRESHOLD {
            Self::Caution
        } else {
            Self::Reconsider
        }
    }

    /// Classify a run summary.
    #[must_use]
    pub fn from_summary(summary: &ResultsSummary) -> Self {
        Self::classify(summary.probability_of_profit)
    }

    /// One-line verdict.
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::Proceed => "PROCEED - Favorable risk-reward profile",
            Self::Caution => "PROCEED WITH CAUTION - Balanced but uncertain",
            Self::Reconsider => "HIGH RISK - Reconsider this investment",
        }
    }

    /// Suggested position size as `(min, max)` fractions of the investment.
    #[must_use]
    pub const fn position_range(&self) -> (f64, f64) {
        match self {
            Self::Proceed => (1.0, 1.0),
            Self::Caution => (0.5, 0.75),
            Self::Reconsider => (0.25, 0.5),
        }
    }

    /// Stop-loss distance below entry as a fraction, when one is advised.
    #[must_use]
    pub const fn stop_loss(&self) -> Option<f64> {
        match self {
            Self::Proceed => Some(PROCEED_STOP_LOSS),
            Self::Caution => Some(CAUTION_STOP_LOSS),
            Self::Reconsider => None,
        }
    }

    /// Stop-loss price level for `investment`.
    #[must_use]
    pub fn stop_loss_level(&self, investment: f64) -> Option<f64> {
        match self {
            Self::Proceed => Some(investment * 0.92),
            Self::Caution => Some(investment * 0.95),
            Self::Reconsider => None,
        }
    }

    /// Days after which a cautious position should be re-evaluated.
    #[must_use]
    pub const fn review_after_days(&self, horizon_days: u32) -> Option<u32> {
        match self {
            Self::Caution => Some(horizon_days / 2),
            Self::Proceed | Self::Reconsider => None,
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.headline())
    }
}

impl From<&ResultsSummary> for Recommendation {
    fn from(summary: &ResultsSummary) -> Self {
        Self::from_summary(summary)
    }
}
