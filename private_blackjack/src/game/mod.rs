//! Blackjack rules engine.
//!
//! Leaves first:
//! - [`entities`]: cards and the scalar types shared by every module
//! - [`shoe`]: the multi-deck card source
//! - [`hand`]: hand scoring and per-hand state
//! - [`dealer`]: shoe ownership, dealing, and the dealer's own play
//! - [`state_machine`]: player actions and the engine that applies them
//! - [`settlement`]: paying out finished hands

pub mod constants;
pub mod dealer;
pub mod entities;
pub mod hand;
pub mod settlement;
pub mod shoe;
pub mod state_machine;
