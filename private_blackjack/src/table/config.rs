//! Table configuration models.

use serde::{Deserialize, Serialize};

use crate::game::{
    constants::{DEFAULT_MAX_SEATS, DEFAULT_NUM_DECKS, MAX_SEATS},
    settlement::PayoutRatio,
};

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Decks in the shoe (default: 6)
    pub num_decks: usize,

    /// Seats numbered `1..=max_seats` (default: 7)
    pub max_seats: usize,

    /// Dealer draws on soft 17 (default: stands)
    pub dealer_hits_soft_17: bool,

    /// What a natural pays (default: 3:2)
    pub blackjack_payout: PayoutRatio,

    /// Fixed shoe seed for reproducible play
    pub shoe_seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            num_decks: DEFAULT_NUM_DECKS,
            max_seats: DEFAULT_MAX_SEATS,
            dealer_hits_soft_17: false,
            blackjack_payout: PayoutRatio::default(),
            shoe_seed: None,
        }
    }
}

impl TableConfig {
    /// Read overrides from the environment. Unset or unparsable variables
    /// keep their defaults.
    ///
    /// * `BJ_NUM_DECKS`
    /// * `BJ_MAX_SEATS`
    /// * `BJ_DEALER_HITS_SOFT_17`
    /// * `BJ_BLACKJACK_PAYOUT_NUM` / `BJ_BLACKJACK_PAYOUT_DEN`
    /// * `BJ_SHOE_SEED`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            num_decks: parse_env_or("BJ_NUM_DECKS", defaults.num_decks),
            max_seats: parse_env_or("BJ_MAX_SEATS", defaults.max_seats),
            dealer_hits_soft_17: parse_env_or("BJ_DEALER_HITS_SOFT_17", defaults.dealer_hits_soft_17),
            blackjack_payout: PayoutRatio::new(
                parse_env_or("BJ_BLACKJACK_PAYOUT_NUM", defaults.blackjack_payout.numerator),
                parse_env_or("BJ_BLACKJACK_PAYOUT_DEN", defaults.blackjack_payout.denominator),
            ),
            shoe_seed: std::env::var("BJ_SHOE_SEED").ok().and_then(|v| v.parse().ok()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.num_decks == 0 {
            return Err("Shoe needs at least one deck".to_string());
        }

        if self.max_seats == 0 || self.max_seats > MAX_SEATS {
            return Err(format!("Max seats must be between 1 and {MAX_SEATS}"));
        }

        if self.blackjack_payout.denominator == 0 {
            return Err("Blackjack payout denominator must be positive".to_string());
        }

        Ok(())
    }
}

fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
