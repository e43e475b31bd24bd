//! Plain-text rendering of calculator results for the command line.

use tracing::debug;

use crate::calc::format::{format_currency, format_percent};
use crate::calc::kelly::FORMULA;
use crate::calc::{
    compute_implied_probabilities, compute_wager, parse_input, KellyInput, ValidationError,
};

/// Kelly recommendation. With a bankroll, the recommended percentage is fed
/// into the wager calculator and the stake amount is appended.
pub fn kelly_report(
    probability: &str,
    odds: &str,
    multiplier: &str,
    bankroll: Option<&str>,
) -> Result<String, ValidationError> {
    let input = KellyInput {
        win_probability: parse_input(probability),
        decimal_odds: parse_input(odds),
        kelly_multiplier: parse_input(multiplier),
    };
    let outcome = input.evaluate()?;
    debug!(?input, ?outcome, "Kelly evaluated");

    let mut lines = vec![
        FORMULA.to_string(),
        format!("Optimal bet: {}", outcome.display()),
        outcome.interpretation(),
    ];

    if let Some(bankroll) = bankroll {
        let amount = compute_wager(parse_input(bankroll), outcome.suggested_wager_percentage())?;
        lines.push(format!("Wager amount: {}", format_currency(amount)));
    }

    Ok(lines.join("\n"))
}

pub fn wager_report(bankroll: &str, percentage: &str) -> Result<String, ValidationError> {
    let amount = compute_wager(parse_input(bankroll), parse_input(percentage))?;
    debug!(amount, "Wager computed");
    Ok(format!("Wager amount: {}", format_currency(amount)))
}

pub fn implied_report(odds: &[String]) -> Result<String, ValidationError> {
    let odds: Vec<f64> = odds.iter().map(|o| parse_input(o)).collect();
    let result = compute_implied_probabilities(&odds)?;
    debug!(?result, "Implied probabilities computed");

    let mut lines: Vec<String> = result
        .labelled()
        .into_iter()
        .map(|(label, p)| format!("{}: {}", label, format_percent(p)))
        .collect();
    lines.push(format!(
        "Total (Overround): {}",
        format_percent(result.overround_percent)
    ));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::Calculator;

    #[test]
    fn test_kelly_report_with_bankroll() {
        let text = kelly_report("0.55", "2.0", "1", Some("1000")).unwrap();
        assert!(text.contains("Optimal bet: 10.00%"));
        assert!(text.contains("Wager amount: $100.00"));
    }

    #[test]
    fn test_kelly_report_no_edge_wagers_nothing() {
        let text = kelly_report("0.4", "2.0", "1", Some("1000")).unwrap();
        assert!(text.contains("Optimal bet: 0%"));
        assert!(text.contains("should not bet"));
        assert!(text.contains("Wager amount: $0.00"));
    }

    #[test]
    fn test_kelly_report_rejects_text() {
        assert_eq!(
            kelly_report("abc", "2.0", "1", None),
            Err(ValidationError::NonNumericInput(Calculator::Kelly))
        );
    }

    #[test]
    fn test_kelly_report_chained_bankroll_is_validated() {
        assert_eq!(
            kelly_report("0.55", "2.0", "1", Some("-5")),
            Err(ValidationError::NegativeBankroll(-5.0))
        );
    }

    #[test]
    fn test_wager_report() {
        assert_eq!(wager_report("1000", "7.5").unwrap(), "Wager amount: $75.00");
    }

    #[test]
    fn test_implied_report_three_way() {
        let odds: Vec<String> = ["1.5", "2.5", "4.0"].iter().map(|s| s.to_string()).collect();
        let text = implied_report(&odds).unwrap();
        assert_eq!(
            text,
            "Home Win: 50.63%\nDraw: 30.38%\nAway Win: 18.99%\nTotal (Overround): 131.67%"
        );
    }

    #[test]
    fn test_implied_report_two_way_labels() {
        let odds: Vec<String> = ["1.9", "1.9"].iter().map(|s| s.to_string()).collect();
        let text = implied_report(&odds).unwrap();
        assert!(text.starts_with("Outcome 1: 50.00%\nOutcome 2: 50.00%"));
    }
}
