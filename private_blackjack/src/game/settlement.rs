//! Settling finished player hands against the dealer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    entities::Chips,
    hand::{Evaluation, Hand, HandStatus},
};

/// How much a natural pays per unit staked, on top of the returned stake.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PayoutRatio {
    pub numerator: u32,
    pub denominator: u32,
}

impl PayoutRatio {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Winnings for `stake`, rounded down.
    pub fn winnings(&self, stake: Chips) -> Chips {
        if self.denominator == 0 {
            return 0;
        }
        stake.saturating_mul(Chips::from(self.numerator)) / Chips::from(self.denominator)
    }
}

impl Default for PayoutRatio {
    fn default() -> Self {
        Self::new(3, 2)
    }
}

impl fmt::Display for PayoutRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Blackjack,
    Win,
    Push,
    Lose,
    Surrendered,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Outcome::Blackjack => "blackjack",
            Outcome::Win => "win",
            Outcome::Push => "push",
            Outcome::Lose => "lose",
            Outcome::Surrendered => "surrendered",
        };
        write!(f, "{repr}")
    }
}

/// Result of settling a single hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Settlement {
    pub outcome: Outcome,
    /// Chips credited back to the player, stake included.
    pub payout: Chips,
}

/// Settle one finished player hand against the dealer's final evaluation.
///
/// Only a hand dealt as a natural counts as blackjack; a split hand that
/// reaches 21 on two cards is an ordinary 21. A surrendered hand pays
/// nothing here since its refund was credited when it surrendered.
pub fn settle_hand(hand: &Hand, dealer: &Evaluation, ratio: PayoutRatio) -> Settlement {
    let stake = hand.bet;
    let natural = hand.status == HandStatus::Blackjack && !hand.from_split;
    let player = hand.evaluate();

    let outcome = match hand.status {
        HandStatus::Surrendered => Outcome::Surrendered,
        _ if player.is_bust => Outcome::Lose,
        _ if natural && dealer.is_blackjack => Outcome::Push,
        _ if natural => Outcome::Blackjack,
        _ if dealer.is_blackjack => Outcome::Lose,
        _ if dealer.is_bust => Outcome::Win,
        _ => match player.total().cmp(&dealer.total()) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Push,
            std::cmp::Ordering::Less => Outcome::Lose,
        },
    };

    let payout = match outcome {
        Outcome::Blackjack => stake.saturating_add(ratio.winnings(stake)),
        Outcome::Win => stake.saturating_mul(2),
        Outcome::Push => stake,
        Outcome::Lose | Outcome::Surrendered => 0,
    };

    Settlement { outcome, payout }
}
