//! Wagering ledger: player balances, bets, and a journal of every chip
//! movement.
//!
//! Every operation applies wholly or not at all. Balances never go
//! negative; a debit that would overdraw fails before anything changes.
//!
//! ## Example
//!
//! ```
//! use private_blackjack::wallet::{Ledger, Player};
//!
//! let ledger = Ledger::new();
//! let mut player = Player::new(1, "alice");
//!
//! ledger.add_balance(&mut player, 500).unwrap();
//!
//! // Can't bet more than the balance
//! assert!(ledger.place_bet(&mut player, 1_000).is_err());
//! assert_eq!(player.balance(), 500);
//!
//! ledger.place_bet(&mut player, 100).unwrap();
//! assert_eq!(player.balance(), 400);
//! assert_eq!(player.bet(), 100);
//! ```

pub mod manager;
pub mod models;

pub use manager::Ledger;
pub use models::{EntryDirection, EntryType, LedgerEntry, Player};
