pub mod format;
pub mod implied;
pub mod kelly;
pub mod validation;
pub mod wager;

pub use implied::{compute_implied_probabilities, ImpliedProbabilities, MarketType, OddsSet};
pub use kelly::{compute_kelly, KellyInput, KellyOutcome, KellyStrategy};
pub use validation::{parse_input, Calculator, ValidationError};
pub use wager::{compute_wager, WagerInput};

/// Number of decimal places used for every displayed figure.
pub const DECIMAL_PLACES: usize = 2;

/// Inclusive bounds for a win probability.
pub const MIN_PROBABILITY: f64 = 0.0;
pub const MAX_PROBABILITY: f64 = 1.0;

/// Decimal odds must be strictly greater than this to return a profit.
pub const MIN_ODDS: f64 = 1.0;
