use log::{debug, info};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{
    constants::DEALER_STANDS_ON,
    entities::Card,
    hand::{Hand, HandStatus, HandValue},
    shoe::Shoe,
};
use crate::{
    errors::{BlackjackError, BlackjackResult},
    wallet::Player,
};

/// Owns the shoe and the dealer's own hand.
///
/// The shoe sits behind its own lock so that concurrent draws never hand
/// out the same card twice. The dealer's hand has a separate lock since
/// it's only touched at round boundaries.
#[derive(Debug)]
pub struct Dealer {
    shoe: Mutex<Shoe>,
    hand: Mutex<Hand>,
    hits_soft_17: bool,
}

// Every mutation behind these locks is all-or-nothing, so a poisoned
// lock still guards consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Dealer {
    #[must_use]
    pub fn new(shoe: Shoe, hits_soft_17: bool) -> Self {
        Self {
            shoe: Mutex::new(shoe),
            hand: Mutex::new(Hand::default()),
            hits_soft_17,
        }
    }

    /// Draw the next card from the shoe.
    pub fn draw(&self) -> BlackjackResult<Card> {
        lock(&self.shoe).draw()
    }

    /// Draw two cards from consecutive shoe positions, or neither.
    pub fn draw_pair(&self) -> BlackjackResult<[Card; 2]> {
        let cards = lock(&self.shoe).draw_many(2)?;
        <[Card; 2]>::try_from(cards).map_err(|_| BlackjackError::ShoeExhausted)
    }

    /// Deal the opening cards of a round: two into the hand each player's
    /// bet opened, in the order given, then two to the dealer.
    ///
    /// Every card comes out under one shoe lock before any hand changes, so
    /// a failed deal leaves the players, the dealer and the shoe untouched.
    ///
    /// # Errors
    ///
    /// * `BlackjackError::IllegalAction` - a player has no bet, or was
    ///   already dealt
    /// * `BlackjackError::ShoeExhausted` - the shoe can't cover every hand
    pub fn deal_round(&self, players: &mut [Player]) -> BlackjackResult<()> {
        for player in players.iter() {
            match player.hand(0) {
                None => {
                    return Err(BlackjackError::illegal(format!(
                        "player {} has no bet this round",
                        player.id
                    )));
                }
                Some(hand) if !hand.is_empty() => {
                    return Err(BlackjackError::illegal(format!(
                        "player {} already holds cards",
                        player.id
                    )));
                }
                Some(_) => {}
            }
        }

        let cards = lock(&self.shoe).draw_many(2 * (players.len() + 1))?;
        let mut pairs = cards.chunks_exact(2).map(|pair| [pair[0], pair[1]]);
        for player in players.iter_mut() {
            let id = player.id;
            if let (Some(hand), Some(pair)) = (player.hand_mut(0), pairs.next()) {
                hand.deal(pair)?;
                debug!("Dealt player {id} {hand}");
            }
        }

        let pair = pairs.next().ok_or(BlackjackError::ShoeExhausted)?;
        let mut hand = lock(&self.hand);
        hand.reset();
        hand.deal(pair)?;
        Ok(())
    }

    /// The dealer's face-up card, if the dealer has been dealt.
    #[must_use]
    pub fn up_card(&self) -> Option<Card> {
        lock(&self.hand).cards().first().copied()
    }

    /// Snapshot of the dealer's hand.
    #[must_use]
    pub fn hand(&self) -> Hand {
        lock(&self.hand).clone()
    }

    /// Draw until reaching 17, also drawing on soft 17 when configured.
    /// Returns the finished hand.
    pub fn play_out(&self) -> BlackjackResult<Hand> {
        let mut hand = lock(&self.hand);
        while self.must_hit(hand.evaluate().value) {
            let card = self.draw()?;
            hand.add_card(card)?;
        }
        if hand.status != HandStatus::Blackjack {
            hand.status = if hand.evaluate().is_bust {
                HandStatus::Bust
            } else {
                HandStatus::Stood
            };
        }
        info!("Dealer finishes with {hand}");
        Ok(hand.clone())
    }

    fn must_hit(&self, value: HandValue) -> bool {
        match value {
            HandValue::Blackjack | HandValue::Bust(_) => false,
            HandValue::Hard(total) => total < DEALER_STANDS_ON,
            HandValue::Soft { high, .. } => {
                high < DEALER_STANDS_ON || (self.hits_soft_17 && high == DEALER_STANDS_ON)
            }
        }
    }

    pub fn reset_hand(&self) {
        lock(&self.hand).reset();
    }

    /// Cards left in the shoe.
    #[must_use]
    pub fn remaining(&self) -> usize {
        lock(&self.shoe).remaining()
    }
}

impl Default for Dealer {
    fn default() -> Self {
        Self::new(Shoe::default(), false)
    }
}
