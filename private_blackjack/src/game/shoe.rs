use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use super::{
    constants::CARDS_PER_DECK,
    entities::{Card, Rank, Suit},
};
use crate::errors::{BlackjackError, BlackjackResult};

/// Multi-deck card source.
///
/// Cards are drawn from the back of the vector. Once the last card is gone
/// the shoe rebuilds and reshuffles itself on the next draw, so a live hand
/// never sees an empty shoe.
#[derive(Debug)]
pub struct Shoe {
    cards: Vec<Card>,
    num_decks: usize,
    rng: StdRng,
}

impl Shoe {
    /// Build an OS-seeded shoe of `num_decks` shuffled decks.
    #[must_use]
    pub fn new(num_decks: usize) -> Self {
        Self::with_rng(num_decks, StdRng::from_os_rng())
    }

    /// Build a shoe whose shuffles are reproducible from `seed`.
    #[must_use]
    pub fn with_seed(num_decks: usize, seed: u64) -> Self {
        Self::with_rng(num_decks, StdRng::seed_from_u64(seed))
    }

    /// Resume a shoe holding exactly `cards`, drawn from the back. Later
    /// rebuilds use `num_decks` shuffled with `seed`.
    #[must_use]
    pub fn from_cards(num_decks: usize, cards: Vec<Card>, seed: u64) -> Self {
        Self {
            cards,
            num_decks,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn with_rng(num_decks: usize, rng: StdRng) -> Self {
        let mut shoe = Self {
            cards: Vec::with_capacity(CARDS_PER_DECK * num_decks),
            num_decks,
            rng,
        };
        shoe.reshuffle();
        shoe
    }

    /// Unshuffled `52 × num_decks` cards, deck after deck.
    fn fresh_cards(num_decks: usize) -> Vec<Card> {
        let mut cards = Vec::with_capacity(CARDS_PER_DECK * num_decks);
        for _ in 0..num_decks {
            for rank in Rank::ALL {
                for suit in Suit::ALL {
                    cards.push(Card::new(rank, suit));
                }
            }
        }
        cards
    }

    /// Discard whatever is left and start over with a full, shuffled shoe.
    pub fn reshuffle(&mut self) {
        self.cards = Self::fresh_cards(self.num_decks);
        self.cards.shuffle(&mut self.rng);
    }

    /// Remove and return the next card, rebuilding first if the shoe is
    /// empty.
    ///
    /// # Errors
    ///
    /// * `BlackjackError::ShoeExhausted` - the shoe holds zero decks, so
    ///   rebuilding yields nothing to draw
    pub fn draw(&mut self) -> BlackjackResult<Card> {
        if self.cards.is_empty() {
            info!("Shoe exhausted, rebuilding {} deck(s)", self.num_decks);
            self.reshuffle();
        }
        let card = self.cards.pop().ok_or(BlackjackError::ShoeExhausted)?;
        debug!("Drew {card} ({} left)", self.cards.len());
        Ok(card)
    }

    /// Draw `count` cards in order, or none at all.
    ///
    /// A shoe with decks to rebuild from can always serve the request; a
    /// zero-deck shoe holding fewer than `count` cards fails before any
    /// card leaves it.
    ///
    /// # Errors
    ///
    /// * `BlackjackError::ShoeExhausted` - fewer than `count` cards can be drawn
    pub fn draw_many(&mut self, count: usize) -> BlackjackResult<Vec<Card>> {
        if self.num_decks == 0 && self.cards.len() < count {
            return Err(BlackjackError::ShoeExhausted);
        }
        (0..count).map(|_| self.draw()).collect()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    /// Cards still in the shoe, next card to be drawn last.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Shoe {
    fn default() -> Self {
        Self::new(super::constants::DEFAULT_NUM_DECKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_shoe_has_six_decks() {
        let shoe = Shoe::default();
        assert_eq!(shoe.num_decks(), 6);
        assert_eq!(shoe.remaining(), 312);
    }

    #[test]
    fn test_fresh_cards_are_in_deck_order() {
        let cards = Shoe::fresh_cards(1);
        assert_eq!(cards.len(), 52);
        assert_eq!(cards[0], Card::new(Rank::Two, Suit::Club));
        assert_eq!(cards[51], Card::new(Rank::Ace, Suit::Heart));
        assert_eq!(Shoe::fresh_cards(3).len(), 156);
        assert!(Shoe::fresh_cards(0).is_empty());
    }

    #[test]
    fn test_new_shoe_is_shuffled() {
        let shoe = Shoe::with_seed(1, 3);
        assert_ne!(shoe.cards(), Shoe::fresh_cards(1).as_slice());
    }

    #[test]
    fn test_draw_many_takes_cards_in_order() {
        let ace = Card::new(Rank::Ace, Suit::Spade);
        let two = Card::new(Rank::Two, Suit::Club);
        let three = Card::new(Rank::Three, Suit::Heart);
        let mut shoe = Shoe::from_cards(0, vec![three, two, ace], 0);
        assert_eq!(shoe.draw_many(2), Ok(vec![ace, two]));
        assert_eq!(shoe.remaining(), 1);
    }

    #[test]
    fn test_draw_many_short_shoe_keeps_its_cards() {
        let ace = Card::new(Rank::Ace, Suit::Spade);
        let mut shoe = Shoe::from_cards(0, vec![ace], 0);
        assert_eq!(shoe.draw_many(2), Err(BlackjackError::ShoeExhausted));
        assert_eq!(shoe.cards(), &[ace]);
        assert_eq!(shoe.draw(), Ok(ace));
    }

    #[test]
    fn test_draw_many_rebuilds_mid_request() {
        let ace = Card::new(Rank::Ace, Suit::Spade);
        let mut shoe = Shoe::from_cards(1, vec![ace], 4);
        let cards = shoe.draw_many(3).unwrap();
        assert_eq!(cards[0], ace);
        assert_eq!(shoe.remaining(), 50);
    }

    #[test]
    fn test_draw_decrements_remaining() {
        let mut shoe = Shoe::with_seed(1, 7);
        for i in 1..=5 {
            shoe.draw().unwrap();
            assert_eq!(shoe.remaining(), 52 - i);
        }
    }

    #[test]
    fn test_single_deck_draws_are_unique() {
        let mut shoe = Shoe::with_seed(1, 11);
        let mut seen = HashSet::new();
        for _ in 0..52 {
            assert!(seen.insert(shoe.draw().unwrap()));
        }
        assert_eq!(shoe.remaining(), 0);
    }

    #[test]
    fn test_draw_rebuilds_when_empty() {
        let mut shoe = Shoe::with_seed(1, 3);
        for _ in 0..52 {
            shoe.draw().unwrap();
        }
        assert!(shoe.draw().is_ok());
        assert_eq!(shoe.remaining(), 51);
    }

    #[test]
    fn test_zero_decks_is_exhausted() {
        let mut shoe = Shoe::with_seed(0, 3);
        assert_eq!(shoe.draw(), Err(BlackjackError::ShoeExhausted));
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = Shoe::with_seed(2, 42);
        let b = Shoe::with_seed(2, 42);
        assert_eq!(a.cards(), b.cards());
    }

    #[test]
    fn test_from_cards_draws_from_back() {
        let ace = Card::new(Rank::Ace, Suit::Spade);
        let two = Card::new(Rank::Two, Suit::Club);
        let mut shoe = Shoe::from_cards(1, vec![two, ace], 0);
        assert_eq!(shoe.draw(), Ok(ace));
        assert_eq!(shoe.draw(), Ok(two));
        assert!(shoe.draw().is_ok());
        assert_eq!(shoe.remaining(), 51);
    }

    #[test]
    fn test_reshuffle_restores_full_shoe() {
        let mut shoe = Shoe::with_seed(2, 5);
        for _ in 0..30 {
            shoe.draw().unwrap();
        }
        shoe.reshuffle();
        assert_eq!(shoe.remaining(), 104);
    }
}
