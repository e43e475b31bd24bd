use clap::{Parser, Subcommand};
use std::net::SocketAddr;

/// Kelly criterion, wager and implied probability calculators
#[derive(Parser, Debug, Clone)]
#[command(name = "kelly-calculator", version, about)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

// Numeric fields are taken as raw text so a malformed value is reported by
// the calculator's own validation rather than by the argument parser.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Optimal fraction of bankroll to stake on a single bet
    Kelly {
        /// Estimated probability of winning (0.0–1.0)
        #[arg(long, short = 'p', allow_hyphen_values = true)]
        probability: String,

        /// Decimal odds offered (must be greater than 1)
        #[arg(long, short = 'o', allow_hyphen_values = true)]
        odds: String,

        /// Fractional Kelly multiplier (1 = full, 0.5 = half, 0.25 = quarter)
        #[arg(
            long,
            short = 'm',
            env = "KELLY_MULTIPLIER",
            default_value = "1",
            allow_hyphen_values = true
        )]
        multiplier: String,

        /// Also size the stake for this bankroll using the Kelly percentage
        #[arg(long, short = 'b', allow_hyphen_values = true)]
        bankroll: Option<String>,
    },

    /// Stake amount for a percentage of the bankroll
    Wager {
        /// Bankroll (currency units)
        #[arg(long, short = 'b', allow_hyphen_values = true)]
        bankroll: String,

        /// Percentage of the bankroll to wager
        #[arg(long, short = 'p', allow_hyphen_values = true)]
        percentage: String,
    },

    /// Implied probabilities and overround for a 2- or 3-outcome market
    Implied {
        /// Decimal odds in outcome order (home, draw, away for 3-way markets)
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        odds: Vec<String>,
    },

    /// Serve the calculator page and JSON API
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:8080")]
        addr: String,

        /// Kelly multiplier used when a request does not specify one
        #[arg(long, env = "KELLY_MULTIPLIER", default_value = "1")]
        default_multiplier: f64,
    },
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Command::Serve {
            addr,
            default_multiplier,
        } = &self.command
        {
            if addr.parse::<SocketAddr>().is_err() {
                anyhow::bail!("addr must be a socket address such as 127.0.0.1:8080, got {addr}");
            }
            if !default_multiplier.is_finite() || *default_multiplier < 0.0 {
                anyhow::bail!("default_multiplier must be a non-negative number");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kelly_with_negative_value() {
        let config =
            Config::try_parse_from(["kelly-calculator", "kelly", "-p", "-0.2", "-o", "2"]).unwrap();
        match config.command {
            Command::Kelly {
                probability, odds, ..
            } => {
                assert_eq!(probability, "-0.2");
                assert_eq!(odds, "2");
            }
            other => panic!("Expected Kelly, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_implied_odds_list() {
        let config =
            Config::try_parse_from(["kelly-calculator", "implied", "1.5", "2.5", "4.0"]).unwrap();
        match config.command {
            Command::Implied { odds } => assert_eq!(odds, vec!["1.5", "2.5", "4.0"]),
            other => panic!("Expected Implied, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bad_addr() {
        let config = Config {
            command: Command::Serve {
                addr: "not-an-addr".into(),
                default_multiplier: 1.0,
            },
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_default_multiplier() {
        let config = Config {
            command: Command::Serve {
                addr: "127.0.0.1:8080".into(),
                default_multiplier: -1.0,
            },
        };
        assert!(config.validate().is_err());
    }
}
