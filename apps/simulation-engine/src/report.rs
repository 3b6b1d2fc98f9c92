//! Human-readable rendering of a [`ResultsSummary`].
//!
//! Statistics stay in full `f64` precision inside the engine; rounding happens
//! only here, through `rust_decimal`, with midpoints rounded away from zero.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::simulation::summary::LOSS_10_THRESHOLD;
use crate::simulation::{Recommendation, ResultsSummary, RiskLevel, SimulationConfig};

/// Format a currency amount rounded to whole units, e.g. `$100,000` or
/// `-$1,235`.
#[must_use]
pub fn format_currency(value: f64) -> String {
    let Some(amount) = Decimal::from_f64_retain(value) else {
        return value.to_string();
    };
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&rounded.abs().trunc().to_string()))
}

/// Format a fraction as a percentage with one decimal place, e.g. `52.3%`.
#[must_use]
pub fn format_percent(fraction: f64) -> String {
    let Some(value) = Decimal::from_f64_retain(fraction) else {
        return fraction.to_string();
    };
    let percent = (value * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.1}%")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a fraction as a signed percentage, e.g. `+4.2%` or `-7.5%`.
#[must_use]
pub fn format_signed_percent(fraction: f64) -> String {
    let formatted = format_percent(fraction);
    if formatted.starts_with('-') {
        formatted
    } else {
        format!("+{formatted}")
    }
}

/// Return of `value` relative to `investment`.
fn relative_return(value: f64, investment: f64) -> f64 {
    (value - investment) / investment
}

/// Text report of one run, rendered through [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    config: &'a SimulationConfig,
    summary: &'a ResultsSummary,
}

impl<'a> Report<'a> {
    /// Report for `summary`, produced by a run of `config`.
    #[must_use]
    pub const fn new(config: &'a SimulationConfig, summary: &'a ResultsSummary) -> Self {
        Self { config, summary }
    }

    fn write_recommendation(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let investment = self.config.initial_investment;
        let summary = self.summary;
        let recommendation = Recommendation::from_summary(summary);
        let (min_position, max_position) = recommendation.position_range();

        writeln!(f, "Recommendation: {}", recommendation.headline())?;
        match recommendation {
            Recommendation::Proceed => writeln!(
                f,
                "- Position sizing: Full investment acceptable for moderate-aggressive investors"
            )?,
            Recommendation::Caution => writeln!(
                f,
                "- Position sizing: Consider reducing to {} - {}",
                format_currency(investment * min_position),
                format_currency(investment * max_position)
            )?,
            Recommendation::Reconsider => writeln!(
                f,
                "- Position sizing: Reduce to {} - {} maximum",
                format_currency(investment * min_position),
                format_currency(investment * max_position)
            )?,
        }
        if let (Some(fraction), Some(level)) = (
            recommendation.stop_loss(),
            recommendation.stop_loss_level(investment),
        ) {
            writeln!(
                f,
                "- Risk management: Stop-loss at {} below entry ({})",
                format_percent(fraction),
                format_currency(level)
            )?;
        }
        match recommendation {
            Recommendation::Proceed => {
                writeln!(
                    f,
                    "- Profit taking: Consider taking partial profits at {} ({})",
                    format_currency(summary.percentile_75),
                    format_signed_percent(relative_return(summary.percentile_75, investment))
                )?;
                write!(
                    f,
                    "- Monitoring: Track performance weekly and adjust based on market conditions"
                )
            }
            Recommendation::Caution => {
                writeln!(
                    f,
                    "- Diversification: Allocate remaining capital to bonds or safer assets"
                )?;
                let days = recommendation
                    .review_after_days(self.config.horizon_days)
                    .unwrap_or_default();
                write!(f, "- Review: Re-evaluate after {days} days")
            }
            Recommendation::Reconsider => {
                writeln!(
                    f,
                    "- Alternative strategy: Wait for better market conditions or consider hedging"
                )?;
                writeln!(
                    f,
                    "- Risk tolerance: Only suitable for aggressive investors who can tolerate \
                     {} chance of {} loss",
                    format_percent(summary.probability_of_loss_10),
                    format_percent(1.0 - LOSS_10_THRESHOLD)
                )?;
                write!(
                    f,
                    "- Exit plan: Define clear exit criteria before entering position"
                )
            }
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config;
        let summary = self.summary;
        let investment = config.initial_investment;
        let risk = RiskLevel::from_summary(summary);

        writeln!(
            f,
            "Monte Carlo simulation: {} trials over {} days",
            summary.trial_count, config.horizon_days
        )?;
        writeln!(
            f,
            "Investment {} at {} ({:.2} shares)",
            format_currency(investment),
            format_currency(summary.current_price),
            summary.share_count
        )?;
        writeln!(f)?;
        writeln!(f, "Expected value      {}", format_currency(summary.mean))?;
        writeln!(
            f,
            "Expected return     {} ({})",
            format_currency(summary.expected_return),
            format_signed_percent(relative_return(summary.mean, investment))
        )?;
        writeln!(f, "Standard deviation  {}", format_currency(summary.std_dev))?;
        writeln!(
            f,
            "Value at Risk (5%)  {} ({} of investment)",
            format_currency(summary.value_at_risk_5),
            format_percent(summary.value_at_risk_5 / investment)
        )?;
        writeln!(
            f,
            "90% range           {} - {}",
            format_currency(summary.percentile_5),
            format_currency(summary.percentile_95)
        )?;
        writeln!(f)?;
        for (label, value) in [
            ("Worst case (P5)   ", summary.percentile_5),
            ("Pessimistic (P25) ", summary.percentile_25),
            ("Median (P50)      ", summary.percentile_50),
            ("Optimistic (P75)  ", summary.percentile_75),
            ("Best case (P95)   ", summary.percentile_95),
        ] {
            writeln!(
                f,
                "{label}  {}  {}",
                format_currency(value),
                format_signed_percent(relative_return(value, investment))
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Probability of profit    {}",
            format_percent(summary.probability_of_profit)
        )?;
        writeln!(
            f,
            "Probability of 10% loss  {}",
            format_percent(summary.probability_of_loss_10)
        )?;
        writeln!(f)?;
        writeln!(f, "{}: {}", risk.label(), risk.message())?;
        writeln!(f)?;
        self.write_recommendation(f)
    }
}

/// Render a multi-line text report of a run.
#[must_use]
pub fn render_report(config: &SimulationConfig, summary: &ResultsSummary) -> String {
    Report::new(config, summary).to_string()
}
