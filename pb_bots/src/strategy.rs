//! Basic strategy for a multi-deck game where the dealer stands on soft 17.
//!
//! Decisions fall back when the preferred action isn't on offer: double
//! and surrender become hit, split is played as the hard total.

use private_blackjack::{Action, Card, Hand, HandValue, Rank};

/// Advice from the strategy tables, before checking what's allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Play {
    Hit,
    Stand,
    Double,
    DoubleOrStand,
    Surrender,
}

fn split_advice(pair: Rank, up: u8) -> bool {
    match pair {
        Rank::Ace | Rank::Eight => true,
        Rank::Nine => matches!(up, 2..=6 | 8 | 9),
        Rank::Seven | Rank::Two | Rank::Three => (2..=7).contains(&up),
        Rank::Six => (2..=6).contains(&up),
        Rank::Four => matches!(up, 5 | 6),
        _ => false,
    }
}

fn soft_advice(high: u8, up: u8) -> Play {
    match high {
        19.. => Play::Stand,
        18 => match up {
            3..=6 => Play::DoubleOrStand,
            2 | 7 | 8 => Play::Stand,
            _ => Play::Hit,
        },
        17 if (3..=6).contains(&up) => Play::Double,
        15 | 16 if (4..=6).contains(&up) => Play::Double,
        13 | 14 if (5..=6).contains(&up) => Play::Double,
        _ => Play::Hit,
    }
}

fn hard_advice(total: u8, up: u8) -> Play {
    match total {
        17.. => Play::Stand,
        16 if up >= 9 => Play::Surrender,
        15 if up == 10 => Play::Surrender,
        13..=16 if up <= 6 => Play::Stand,
        12 if (4..=6).contains(&up) => Play::Stand,
        11 => Play::Double,
        10 if up <= 9 => Play::Double,
        9 if (3..=6).contains(&up) => Play::Double,
        _ => Play::Hit,
    }
}

/// Pick an action for `hand` against the dealer's `up` card out of
/// `available`. Returns `None` only when `available` is empty.
pub fn decide(hand: &Hand, up: Card, available: &[Action]) -> Option<Action> {
    let allowed = |name: &str| {
        available
            .iter()
            .copied()
            .find(|action| action.to_string() == name)
    };
    let up = up.value();

    if let [first, second] = hand.cards() {
        let pair = first.value() == second.value();
        if pair && allowed("split").is_some() && split_advice(first.rank, up) {
            return allowed("split");
        }
    }

    let play = match hand.evaluate().value {
        HandValue::Soft { high, .. } => soft_advice(high, up),
        HandValue::Hard(total) => hard_advice(total, up),
        HandValue::Blackjack | HandValue::Bust(_) => Play::Stand,
    };

    let choice = match play {
        Play::Hit => allowed("hit"),
        Play::Stand => allowed("stand"),
        Play::Double => allowed("double").or_else(|| allowed("hit")),
        Play::DoubleOrStand => allowed("double").or_else(|| allowed("stand")),
        Play::Surrender => allowed("surrender").or_else(|| allowed("hit")),
    };
    choice.or_else(|| available.first().copied())
}
