//! Hand scoring and per-hand state.
//!
//! [`evaluate`] is a pure function of a card sequence. Every Ace starts at
//! 11 and is demoted to 1, one at a time, while the total exceeds 21. What
//! is left over decides the reading:
//!
//! - total above 21 after every Ace is low: bust
//! - no Ace still counted high: a single hard total
//! - at least one Ace still high: a soft total, reported with its all-low
//!   alternative
//!
//! Two cards totalling 21 read as blackjack instead of a soft pair.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    constants::{ACE_DEMOTION, BLACKJACK},
    entities::{Card, Chips},
};
use crate::errors::{BlackjackError, BlackjackResult};

/// How a card sequence scores.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum HandValue {
    /// Exactly two cards totalling 21.
    Blackjack,
    /// Every Ace counted as 1 and the total still exceeds 21.
    Bust(u8),
    /// No Ace left at 11.
    Hard(u8),
    /// At least one Ace at 11. `low` counts every Ace as 1.
    Soft { low: u8, high: u8 },
}

impl HandValue {
    /// The highest total that doesn't bust, or the bust total.
    #[must_use]
    pub fn best(&self) -> u8 {
        match *self {
            Self::Blackjack => BLACKJACK,
            Self::Bust(total) | Self::Hard(total) => total,
            Self::Soft { high, .. } => high,
        }
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blackjack => write!(f, "{BLACKJACK} - BlackJack"),
            Self::Bust(total) => write!(f, "{total} - Bust"),
            Self::Hard(total) => write!(f, "{total}"),
            // No point offering a lower alternative to 21.
            Self::Soft { high, .. } if *high == BLACKJACK => write!(f, "{high}"),
            Self::Soft { low, high } => write!(f, "{low}/{high}"),
        }
    }
}

/// Result of scoring a card sequence.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Evaluation {
    pub value: HandValue,
    pub is_blackjack: bool,
    pub is_bust: bool,
    pub is_splittable: bool,
}

impl Evaluation {
    #[must_use]
    pub fn total(&self) -> u8 {
        self.value.best()
    }
}

/// Score a card sequence.
#[must_use]
pub fn evaluate(cards: &[Card]) -> Evaluation {
    let mut total: u32 = 0;
    let mut high_aces: u32 = 0;
    for card in cards {
        total += u32::from(card.value());
        if card.rank.is_ace() {
            high_aces += 1;
        }
    }

    while total > u32::from(BLACKJACK) && high_aces > 0 {
        total -= u32::from(ACE_DEMOTION);
        high_aces -= 1;
    }

    // Hands never get anywhere near u8::MAX in play; saturate anyway.
    let total = u8::try_from(total).unwrap_or(u8::MAX);
    let is_blackjack = cards.len() == 2 && total == BLACKJACK;
    let value = if is_blackjack {
        HandValue::Blackjack
    } else if total > BLACKJACK {
        HandValue::Bust(total)
    } else if high_aces == 0 {
        HandValue::Hard(total)
    } else {
        // high_aces <= 1 here: two high Aces would already be 22+.
        let low = total - ACE_DEMOTION * high_aces as u8;
        HandValue::Soft { low, high: total }
    };

    Evaluation {
        value,
        is_blackjack,
        is_bust: matches!(value, HandValue::Bust(_)),
        is_splittable: is_splittable(cards),
    }
}

/// Exactly two cards of equal blackjack value.
#[must_use]
pub fn is_splittable(cards: &[Card]) -> bool {
    matches!(cards, [first, second] if first.value() == second.value())
}

/// Where a hand is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum HandStatus {
    /// Bet placed, no cards yet.
    #[default]
    AwaitingBet,
    /// Initial two cards dealt, no action taken.
    Dealt,
    /// At least one action taken, more allowed.
    InPlay,
    Stood,
    Bust,
    Blackjack,
    Surrendered,
    /// Doubled down; the one extra card has been drawn.
    Doubled,
}

impl HandStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Stood | Self::Bust | Self::Blackjack | Self::Surrendered | Self::Doubled
        )
    }
}

impl fmt::Display for HandStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::AwaitingBet => "awaiting bet",
            Self::Dealt => "dealt",
            Self::InPlay => "in play",
            Self::Stood => "stood",
            Self::Bust => "bust",
            Self::Blackjack => "blackjack",
            Self::Surrendered => "surrendered",
            Self::Doubled => "doubled",
        };
        write!(f, "{repr}")
    }
}

/// One wagered position: its cards, its stake, and its lifecycle state.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
    pub bet: Chips,
    pub status: HandStatus,
    /// Forked by a split. A split hand reaching 21 on two cards is scored
    /// as 21, never paid as a natural.
    pub from_split: bool,
}

impl Hand {
    #[must_use]
    pub fn new(bet: Chips) -> Self {
        Self {
            cards: Vec::with_capacity(2),
            bet,
            status: HandStatus::AwaitingBet,
            from_split: false,
        }
    }

    /// Build a hand holding `cards` in the given status. Used by
    /// persistence collaborators rehydrating a stored hand.
    #[must_use]
    pub fn from_parts(cards: Vec<Card>, bet: Chips, status: HandStatus, from_split: bool) -> Self {
        Self {
            cards,
            bet,
            status,
            from_split,
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn evaluate(&self) -> Evaluation {
        evaluate(&self.cards)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Append a card.
    ///
    /// # Errors
    ///
    /// * `BlackjackError::IllegalAction` - the hand is terminal
    pub fn add_card(&mut self, card: Card) -> BlackjackResult<()> {
        if self.is_terminal() {
            return Err(BlackjackError::illegal(format!(
                "hand is {} and takes no more cards",
                self.status
            )));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Take the second card for a split, leaving the first.
    pub(crate) fn take_split_card(&mut self) -> Option<Card> {
        if self.cards.len() == 2 {
            self.cards.pop()
        } else {
            None
        }
    }

    /// Take the opening two cards.
    pub(crate) fn deal(&mut self, [first, second]: [Card; 2]) -> BlackjackResult<()> {
        if !self.is_empty() {
            return Err(BlackjackError::illegal("hand already holds cards"));
        }
        self.cards.extend([first, second]);
        self.finish_deal();
        Ok(())
    }

    /// Mark the end of the initial deal. A natural goes straight to
    /// `Blackjack`.
    pub(crate) fn finish_deal(&mut self) {
        self.status = if self.evaluate().is_blackjack {
            HandStatus::Blackjack
        } else {
            HandStatus::Dealt
        };
    }

    /// Status after a card was added by hit.
    pub(crate) fn settle_after_draw(&mut self) {
        self.status = if self.evaluate().is_bust {
            HandStatus::Bust
        } else {
            HandStatus::InPlay
        };
    }

    pub fn reset(&mut self) {
        self.cards.clear();
        self.bet = 0;
        self.status = HandStatus::AwaitingBet;
        self.from_split = false;
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = self
            .cards
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "[{cards}] {}", self.evaluate().value)
    }
}
