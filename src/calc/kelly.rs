//! Kelly Criterion betting size calculator.
//!
//! The Kelly formula sizes a bet to maximise the expected logarithm of wealth,
//! which balances risk and reward optimally over the long run.
//!
//! Standard formula:
//!   f* = (b·p − q) / b
//! where
//!   b  = net odds received on the bet (decimal odds − 1)
//!   p  = estimated probability of winning
//!   q  = 1 − p  (probability of losing)
//!
//! A *fractional* Kelly multiplier scales the result to reduce variance at
//! the cost of slightly lower expected growth.

use super::format::{format_percent, round_to};
use super::validation::{is_numeric, Calculator, ValidationError};
use super::{DECIMAL_PLACES, MAX_PROBABILITY, MIN_ODDS, MIN_PROBABILITY};

/// Formula in display form, for front ends that render it next to the result.
pub const FORMULA: &str = "f* = (bp - q) / b";

/// Multipliers closer than this to a preset are treated as that preset.
const STRATEGY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KellyInput {
    /// Estimated probability that the bet wins (0.0–1.0).
    pub win_probability: f64,
    /// Decimal odds offered (must be > 1.0).
    pub decimal_odds: f64,
    /// Fractional Kelly multiplier (1.0 = full Kelly).
    pub kelly_multiplier: f64,
}

impl KellyInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_numeric(self.win_probability)
            || !is_numeric(self.decimal_odds)
            || !is_numeric(self.kelly_multiplier)
        {
            return Err(ValidationError::NonNumericInput(Calculator::Kelly));
        }
        if !(MIN_PROBABILITY..=MAX_PROBABILITY).contains(&self.win_probability) {
            return Err(ValidationError::ProbabilityOutOfRange(self.win_probability));
        }
        if self.decimal_odds <= MIN_ODDS {
            return Err(ValidationError::OddsTooLow(Calculator::Kelly));
        }
        if self.kelly_multiplier < 0.0 {
            return Err(ValidationError::NegativeKellyMultiplier(
                self.kelly_multiplier,
            ));
        }
        Ok(())
    }

    /// Validate, compute and apply the no-bet policy in one step.
    pub fn evaluate(&self) -> Result<KellyOutcome, ValidationError> {
        let fraction = compute_kelly(
            self.win_probability,
            self.decimal_odds,
            self.kelly_multiplier,
        )?;
        Ok(KellyOutcome::from_fraction(fraction, self.kelly_multiplier))
    }
}

/// Unscaled Kelly fraction. Callers must have validated `decimal_odds > 1`.
///
/// Negative when the bet has no edge.
pub fn full_kelly_fraction(win_probability: f64, decimal_odds: f64) -> f64 {
    let b = decimal_odds - 1.0;
    let p = win_probability;
    let q = 1.0 - p;

    (b * p - q) / b
}

/// Calculate the scaled Kelly stake fraction.
///
/// # Arguments
/// * `win_probability`  – Estimated probability that the bet wins (0.0–1.0).
/// * `decimal_odds`     – Decimal odds offered, strictly greater than 1.0.
/// * `kelly_multiplier` – Fractional Kelly multiplier (≥ 0.0).
///
/// # Returns
/// The raw fraction of bankroll to stake, which may be zero or negative when
/// there is no edge. Use [`KellyOutcome::from_fraction`] to turn it into a
/// recommendation.
pub fn compute_kelly(
    win_probability: f64,
    decimal_odds: f64,
    kelly_multiplier: f64,
) -> Result<f64, ValidationError> {
    KellyInput {
        win_probability,
        decimal_odds,
        kelly_multiplier,
    }
    .validate()?;

    Ok(full_kelly_fraction(win_probability, decimal_odds) * kelly_multiplier)
}

/// Calculate the edge (expected value) of a bet per unit staked.
///
/// Edge = win_prob × decimal_odds − 1
///
/// Positive edge means the odds overpay relative to the true probability.
pub fn edge(win_probability: f64, decimal_odds: f64) -> f64 {
    win_probability * decimal_odds - 1.0
}

/// Named Kelly presets offered by the front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KellyStrategy {
    Full,
    Half,
    Quarter,
    /// Any multiplier that is not one of the presets.
    Fractional,
}

impl KellyStrategy {
    pub const PRESETS: [KellyStrategy; 3] =
        [KellyStrategy::Full, KellyStrategy::Half, KellyStrategy::Quarter];

    pub fn from_multiplier(multiplier: f64) -> Self {
        Self::PRESETS
            .into_iter()
            .find(|s| {
                s.multiplier()
                    .is_some_and(|m| (m - multiplier).abs() < STRATEGY_TOLERANCE)
            })
            .unwrap_or(KellyStrategy::Fractional)
    }

    pub fn multiplier(self) -> Option<f64> {
        match self {
            KellyStrategy::Full => Some(1.0),
            KellyStrategy::Half => Some(0.5),
            KellyStrategy::Quarter => Some(0.25),
            KellyStrategy::Fractional => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KellyStrategy::Full => "Full Kelly",
            KellyStrategy::Half => "Half Kelly",
            KellyStrategy::Quarter => "Quarter Kelly",
            KellyStrategy::Fractional => "Fractional Kelly",
        }
    }
}

/// Recommendation derived from a scaled Kelly fraction.
#[derive(Debug, Clone, PartialEq)]
pub enum KellyOutcome {
    /// Positive edge: stake `fraction` of the bankroll.
    Bet { fraction: f64, kelly_multiplier: f64 },
    /// Fraction ≤ 0: do not bet.
    NoEdge,
}

impl KellyOutcome {
    pub fn from_fraction(fraction: f64, kelly_multiplier: f64) -> Self {
        if fraction > 0.0 {
            KellyOutcome::Bet {
                fraction,
                kelly_multiplier,
            }
        } else {
            KellyOutcome::NoEdge
        }
    }

    pub fn is_bet(&self) -> bool {
        matches!(self, KellyOutcome::Bet { .. })
    }

    /// Fraction actually recommended; never negative.
    pub fn fraction(&self) -> f64 {
        match self {
            KellyOutcome::Bet { fraction, .. } => *fraction,
            KellyOutcome::NoEdge => 0.0,
        }
    }

    /// `"10.00%"` for a bet, `"0%"` when there is no edge.
    pub fn display(&self) -> String {
        match self {
            KellyOutcome::Bet { fraction, .. } => format_percent(fraction * 100.0),
            KellyOutcome::NoEdge => "0%".to_string(),
        }
    }

    pub fn interpretation(&self) -> String {
        match self {
            KellyOutcome::Bet {
                kelly_multiplier, ..
            } => {
                let mut text = format!(
                    "The formula suggests you should wager {} of your bankroll.",
                    self.display()
                );
                if *kelly_multiplier < 1.0 {
                    text.push_str(&format!(
                        " (This is based on a {} strategy).",
                        KellyStrategy::from_multiplier(*kelly_multiplier).name()
                    ));
                }
                text
            }
            KellyOutcome::NoEdge => {
                "You do not have an edge. The Kelly Criterion suggests you should not bet."
                    .to_string()
            }
        }
    }

    /// Percentage a caller may feed into the wager calculator, rounded the
    /// same way it is displayed.
    pub fn suggested_wager_percentage(&self) -> f64 {
        round_to(self.fraction() * 100.0, DECIMAL_PLACES)
    }
}
