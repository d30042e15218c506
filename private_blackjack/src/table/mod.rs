//! Table module: configuration, seat bookkeeping, and the round flow.
//!
//! [`TableManager`] is the single place that builds the shoe, dealer,
//! ledger and action engine and hands them to each other. It drives a
//! round through its phases:
//!
//! 1. **Betting**: players take seats and place bets
//! 2. **Playing**: `start_round` deals; players act through `execute_action`
//! 3. `finish_round` plays the dealer out, settles, and reopens betting
//!
//! ## Example
//!
//! ```
//! use private_blackjack::{
//!     repository::InMemoryPlayerRepository,
//!     table::{TableConfig, TableManager},
//! };
//! use std::sync::Arc;
//!
//! let table = TableManager::new(
//!     TableConfig::default(),
//!     Arc::new(InMemoryPlayerRepository::new()),
//! );
//! table.create_player(1, "alice").unwrap();
//! table.add_balance(1, 100).unwrap();
//! table.seat_player(1, 1).unwrap();
//! table.place_bet(1, 10).unwrap();
//!
//! table.start_round().unwrap();
//! while let Some(index) = table
//!     .get_player(1)
//!     .unwrap()
//!     .hands()
//!     .iter()
//!     .position(|hand| !hand.is_terminal())
//! {
//!     table.execute_action("stand", 1, index).unwrap();
//! }
//! let summary = table.finish_round().unwrap();
//! assert_eq!(summary.results.len(), 1);
//! ```

pub mod config;
pub mod manager;
pub mod seating;

pub use config::TableConfig;
pub use manager::{HandResult, RoundPhase, RoundSummary, TableManager};
pub use seating::Seating;
