use super::validation::{is_numeric, Calculator, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WagerInput {
    pub bankroll: f64,
    /// Percentage of the bankroll, e.g. 7.5 for 7.5%. Values above 100 are
    /// allowed and yield a wager larger than the bankroll.
    pub wager_percentage: f64,
}

impl WagerInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_numeric(self.bankroll) || !is_numeric(self.wager_percentage) {
            return Err(ValidationError::NonNumericInput(Calculator::Wager));
        }
        if self.bankroll < 0.0 {
            return Err(ValidationError::NegativeBankroll(self.bankroll));
        }
        if self.wager_percentage < 0.0 {
            return Err(ValidationError::NegativeWagerPercentage(
                self.wager_percentage,
            ));
        }
        Ok(())
    }
}

/// Stake amount for `wager_percentage` percent of `bankroll`.
pub fn compute_wager(bankroll: f64, wager_percentage: f64) -> Result<f64, ValidationError> {
    WagerInput {
        bankroll,
        wager_percentage,
    }
    .validate()?;

    let amount = bankroll * (wager_percentage / 100.0);
    if !amount.is_finite() {
        return Err(ValidationError::WagerTooLarge);
    }
    Ok(amount)
}
