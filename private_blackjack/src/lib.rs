//! # Private Blackjack
//!
//! A blackjack rules engine: a multi-deck shoe, hand scoring, a per-hand
//! action state machine, and the wagering ledger those actions debit and
//! credit.
//!
//! Everything here is synchronous and in-process. Transport and
//! persistence live outside the crate; the engine exchanges plain data
//! and loads players through the [`repository::PlayerRepository`] seam.
//!
//! ## Hand lifecycle
//!
//! - **AwaitingBet**: a bet opened the hand, no cards yet
//! - **Dealt**: two cards; a natural goes straight to **Blackjack**
//! - **InPlay**: at least one action taken, or forked by a split
//! - **Stood / Bust / Blackjack / Surrendered / Doubled**: terminal
//!
//! ## Core Modules
//!
//! - [`game`]: cards, shoe, scoring, dealer, actions, settlement
//! - [`wallet`]: players, the ledger, and its journal
//! - [`table`]: configuration, seating, and round flow
//!
//! ## Example
//!
//! ```
//! use private_blackjack::game::{
//!     entities::{Card, Rank, Suit},
//!     hand::evaluate,
//! };
//!
//! let hand = [Card::new(Rank::Ace, Suit::Spade), Card::new(Rank::Three, Suit::Heart)];
//! let eval = evaluate(&hand);
//! assert_eq!(eval.value.to_string(), "4/14");
//! assert!(!eval.is_blackjack);
//! ```

pub mod errors;
pub use errors::{BlackjackError, BlackjackResult};

/// Cards, shoe, hand scoring, dealer, actions, and settlement.
pub mod game;
pub use game::{
    constants,
    dealer::Dealer,
    entities::{self, Card, Chips, HandIndex, PlayerId, Rank, SeatNumber, Suit},
    hand::{Evaluation, Hand, HandStatus, HandValue, evaluate},
    settlement::{Outcome, PayoutRatio},
    shoe::Shoe,
    state_machine::{Action, ActionEngine},
};

pub mod repository;
pub use repository::{InMemoryPlayerRepository, PlayerRepository};

/// Seating and round orchestration.
pub mod table;
pub use table::{RoundSummary, TableConfig, TableManager};

/// Player balances, bets, and the chip journal.
pub mod wallet;
pub use wallet::{Ledger, Player};
