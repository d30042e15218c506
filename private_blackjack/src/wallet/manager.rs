//! Ledger implementation: balance checks, debits, credits, and the journal.

use chrono::Utc;
use log::{debug, warn};
use std::sync::{Mutex, PoisonError};

use super::models::{EntryType, LedgerEntry, Player};
use crate::{
    errors::{BlackjackError, BlackjackResult},
    game::entities::{Chips, PlayerId},
};

/// Ledger
///
/// Stateless with respect to players: it validates and applies chip
/// movements to the `Player` it is handed and journals each one. Callers
/// hold whatever lock guards that player for the duration of the call.
#[derive(Debug, Default)]
pub struct Ledger {
    journal: Mutex<Vec<LedgerEntry>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the opening bet for a round
    ///
    /// Debits the balance, records the bet, and opens a single hand
    /// awaiting the deal.
    ///
    /// # Errors
    ///
    /// * `BlackjackError::NegativeAmount` - `amount` is below zero
    /// * `BlackjackError::IllegalAction` - `amount` is zero, or a bet is
    ///   already outstanding this round
    /// * `BlackjackError::InsufficientBalance` - `amount` exceeds the balance
    pub fn place_bet(&self, player: &mut Player, amount: Chips) -> BlackjackResult<()> {
        if amount < 0 {
            return Err(BlackjackError::NegativeAmount(amount));
        }
        if amount == 0 {
            return Err(BlackjackError::illegal("bet must be positive"));
        }
        if player.in_round() {
            return Err(BlackjackError::illegal(format!(
                "bet of {} already placed this round",
                player.bet()
            )));
        }

        self.debit(player, amount, EntryType::Bet)?;
        player.open_round(amount);
        Ok(())
    }

    /// Add chips to a player's balance
    ///
    /// # Errors
    ///
    /// * `BlackjackError::NegativeAmount` - `amount` is below zero
    pub fn add_balance(&self, player: &mut Player, amount: Chips) -> BlackjackResult<()> {
        if amount < 0 {
            warn!("Rejected negative deposit of {amount} for player {}", player.id);
            return Err(BlackjackError::NegativeAmount(amount));
        }
        self.credit(player, amount, EntryType::Deposit)?;
        Ok(())
    }

    /// Take `amount` from the balance
    ///
    /// Checks and subtracts in one step; on failure the balance is
    /// untouched.
    ///
    /// # Returns
    ///
    /// * `BlackjackResult<Chips>` - New balance or error
    pub(crate) fn debit(
        &self,
        player: &mut Player,
        amount: Chips,
        entry_type: EntryType,
    ) -> BlackjackResult<Chips> {
        if amount < 0 {
            return Err(BlackjackError::NegativeAmount(amount));
        }
        let available = player.balance();
        if amount > available {
            warn!(
                "Player {} can't cover {entry_type} of {amount} (balance {available})",
                player.id
            );
            return Err(BlackjackError::InsufficientBalance {
                available,
                required: amount,
            });
        }

        let new_balance = available - amount;
        player.set_balance(new_balance);
        self.record(player.id, amount, new_balance, entry_type);
        Ok(new_balance)
    }

    /// Give `amount` to the player
    ///
    /// # Returns
    ///
    /// * `BlackjackResult<Chips>` - New balance or error
    pub(crate) fn credit(
        &self,
        player: &mut Player,
        amount: Chips,
        entry_type: EntryType,
    ) -> BlackjackResult<Chips> {
        if amount < 0 {
            return Err(BlackjackError::NegativeAmount(amount));
        }
        let new_balance = player
            .balance()
            .checked_add(amount)
            .ok_or_else(|| BlackjackError::illegal("balance would overflow"))?;

        player.set_balance(new_balance);
        self.record(player.id, amount, new_balance, entry_type);
        Ok(new_balance)
    }

    fn record(&self, player_id: PlayerId, amount: Chips, balance_after: Chips, entry_type: EntryType) {
        debug!("Player {player_id}: {entry_type} of {amount}, balance now {balance_after}");
        let entry = LedgerEntry {
            player_id,
            amount,
            balance_after,
            direction: entry_type.direction(),
            entry_type,
            created_at: Utc::now(),
        };
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Journaled entries for one player, oldest first
    pub fn entries_for(&self, player_id: PlayerId) -> Vec<LedgerEntry> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.player_id == player_id)
            .cloned()
            .collect()
    }
}
