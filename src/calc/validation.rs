//! Input validation shared by the three calculators.
//!
//! Validation always runs to completion before any arithmetic. The first
//! failing check is reported and nothing is computed; out-of-range values
//! are never clamped.

use thiserror::Error;

use super::{MAX_PROBABILITY, MIN_ODDS, MIN_PROBABILITY};

/// Which calculator raised a validation failure. Some failures share a
/// variant but are worded differently per calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculator {
    Kelly,
    Wager,
    ImpliedProbability,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{}", non_numeric_message(.0))]
    NonNumericInput(Calculator),

    #[error(
        "Probability of winning must be between {} and {}.",
        MIN_PROBABILITY,
        MAX_PROBABILITY
    )]
    ProbabilityOutOfRange(f64),

    #[error("{}", odds_too_low_message(.0))]
    OddsTooLow(Calculator),

    #[error("Bankroll cannot be negative.")]
    NegativeBankroll(f64),

    #[error("Wager percentage cannot be negative.")]
    NegativeWagerPercentage(f64),

    #[error("Kelly multiplier cannot be negative.")]
    NegativeKellyMultiplier(f64),

    #[error("A market must have 2 or 3 outcomes, got {0}.")]
    UnsupportedMarketSize(usize),

    #[error("Wager amount is too large to calculate.")]
    WagerTooLarge,
}

fn non_numeric_message(calculator: &Calculator) -> &'static str {
    match calculator {
        Calculator::Kelly => "Please enter valid numbers for both fields.",
        Calculator::Wager => "Please enter valid numbers for bankroll and wager percentage.",
        Calculator::ImpliedProbability => "Please enter valid decimal odds for all outcomes.",
    }
}

fn odds_too_low_message(calculator: &Calculator) -> String {
    match calculator {
        Calculator::ImpliedProbability => {
            format!("All decimal odds must be greater than {}.", MIN_ODDS)
        }
        _ => format!(
            "Decimal odds must be greater than {} to have a potential for profit.",
            MIN_ODDS
        ),
    }
}

/// A field counts as numeric only when it parsed to a finite value.
pub fn is_numeric(value: f64) -> bool {
    value.is_finite()
}

/// Parse a raw text field the way the front ends do: surrounding whitespace
/// is ignored and anything unparsable becomes `NaN`, which validation then
/// rejects as non-numeric.
pub fn parse_input(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}
