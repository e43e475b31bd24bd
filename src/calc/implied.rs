//! Implied probabilities from a set of decimal odds.
//!
//! Each outcome's raw implied probability is the inverse of its odds. The sum
//! of the inverses is the overround (bookmaker book percentage); dividing each
//! inverse by that sum removes the margin so the probabilities total 100%.

use serde::Serialize;

use super::validation::{is_numeric, Calculator, ValidationError};
use super::MIN_ODDS;

/// Market shapes supported by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    /// Two outcomes, e.g. a moneyline.
    TwoWay,
    /// Home / draw / away.
    ThreeWay,
}

impl MarketType {
    pub fn from_outcome_count(count: usize) -> Result<Self, ValidationError> {
        match count {
            2 => Ok(MarketType::TwoWay),
            3 => Ok(MarketType::ThreeWay),
            n => Err(ValidationError::UnsupportedMarketSize(n)),
        }
    }

    /// Positional outcome labels; index i names odds i.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            MarketType::TwoWay => &["Outcome 1", "Outcome 2"],
            MarketType::ThreeWay => &["Home Win", "Draw", "Away Win"],
        }
    }
}

/// A validated, ordered set of 2 or 3 decimal odds.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsSet {
    market: MarketType,
    odds: Vec<f64>,
}

impl OddsSet {
    pub fn new(odds: Vec<f64>) -> Result<Self, ValidationError> {
        let market = MarketType::from_outcome_count(odds.len())?;
        if !odds.iter().all(|o| is_numeric(*o)) {
            return Err(ValidationError::NonNumericInput(
                Calculator::ImpliedProbability,
            ));
        }
        if odds.iter().any(|o| *o <= MIN_ODDS) {
            return Err(ValidationError::OddsTooLow(Calculator::ImpliedProbability));
        }
        Ok(Self { market, odds })
    }

    pub fn implied_probabilities(&self) -> ImpliedProbabilities {
        let inverses: Vec<f64> = self.odds.iter().map(|o| 1.0 / o).collect();
        let total: f64 = inverses.iter().sum();

        ImpliedProbabilities {
            market: self.market,
            probabilities: inverses.iter().map(|v| v / total * 100.0).collect(),
            overround_percent: total * 100.0,
        }
    }
}

/// Margin-free probabilities (in percent, input order) plus the overround.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpliedProbabilities {
    pub market: MarketType,
    pub probabilities: Vec<f64>,
    pub overround_percent: f64,
}

impl ImpliedProbabilities {
    /// Bookmaker margin: how far the overround exceeds 100%.
    pub fn margin_percent(&self) -> f64 {
        self.overround_percent - 100.0
    }

    pub fn labelled(&self) -> Vec<(&'static str, f64)> {
        self.market
            .labels()
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
            .collect()
    }
}

/// Validate `odds` and compute their implied probabilities.
pub fn compute_implied_probabilities(
    odds: &[f64],
) -> Result<ImpliedProbabilities, ValidationError> {
    Ok(OddsSet::new(odds.to_vec())?.implied_probabilities())
}
