//! Display helpers. All figures are computed at full precision and only
//! rounded here, at the presentation boundary.

use super::DECIMAL_PLACES;

/// Round `value` half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: usize) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Fixed-point text using the same tie rule as [`round_to`], so a displayed
/// figure always matches the rounded number reported beside it.
pub fn format_fixed(value: f64) -> String {
    format!("{:.*}", DECIMAL_PLACES, round_to(value, DECIMAL_PLACES))
}

/// `12.3456` → `"12.35%"` (the value is already a percentage).
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_fixed(value))
}

/// `75.0` → `"$75.00"`
pub fn format_currency(value: f64) -> String {
    format!("${}", format_fixed(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_round_to_two_places() {
        assert_relative_eq!(round_to(50.632911, 2), 50.63, epsilon = 1e-12);
        assert_relative_eq!(round_to(18.987341, 2), 18.99, epsilon = 1e-12);
        assert_relative_eq!(round_to(-0.126, 2), -0.13, epsilon = 1e-12);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(10.000000000000002), "10.00%");
        assert_eq!(format_percent(131.666666), "131.67%");
    }

    #[test]
    fn test_ties_round_away_from_zero_in_text() {
        // 0.125 is exact in binary; plain `{:.2}` would print "0.12"
        assert_eq!(format_fixed(0.125), "0.13");
        assert_eq!(format_percent(0.125), "0.13%");
        assert_eq!(format_currency(-0.125), "$-0.13");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(75.0), "$75.00");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1234.5), "$1234.50");
    }
}
