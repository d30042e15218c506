//! Wallet data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{
    entities::{Chips, HandIndex, PlayerId, SeatNumber},
    hand::Hand,
};

/// Player model
///
/// Balance and bet are only changed through the [`Ledger`](super::Ledger),
/// hands only through the action engine and the table manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    balance: Chips,
    /// Stake placed for the current round. Zero between rounds.
    bet: Chips,
    hands: Vec<Hand>,
    pub seat: Option<SeatNumber>,
}

impl Player {
    pub fn new(id: PlayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            balance: 0,
            bet: 0,
            hands: Vec::new(),
            seat: None,
        }
    }

    pub fn balance(&self) -> Chips {
        self.balance
    }

    pub fn bet(&self) -> Chips {
        self.bet
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn hand(&self, index: HandIndex) -> Option<&Hand> {
        self.hands.get(index)
    }

    pub(crate) fn hand_mut(&mut self, index: HandIndex) -> Option<&mut Hand> {
        self.hands.get_mut(index)
    }

    pub(crate) fn insert_hand(&mut self, index: HandIndex, hand: Hand) {
        self.hands.insert(index, hand);
    }

    pub(crate) fn set_balance(&mut self, balance: Chips) {
        self.balance = balance;
    }

    pub(crate) fn open_round(&mut self, bet: Chips) {
        self.bet = bet;
        self.hands = vec![Hand::new(bet)];
    }

    /// Drop this round's hands and bet.
    pub(crate) fn close_round(&mut self) {
        self.bet = 0;
        self.hands.clear();
    }

    /// A bet has been placed for the current round.
    pub fn in_round(&self) -> bool {
        self.bet > 0
    }
}

/// Ledger entry model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub player_id: PlayerId,
    pub amount: Chips,
    pub balance_after: Chips,
    pub direction: EntryDirection,
    pub entry_type: EntryType,
    pub created_at: DateTime<Utc>,
}

/// Entry direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    Debit,
    Credit,
}

impl std::fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryDirection::Debit => write!(f, "debit"),
            EntryDirection::Credit => write!(f, "credit"),
        }
    }
}

/// Entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Deposit,
    Bet,
    DoubleDown,
    Split,
    SurrenderRefund,
    Payout,
    Reversal,
}

impl EntryType {
    pub fn direction(self) -> EntryDirection {
        match self {
            EntryType::Bet | EntryType::DoubleDown | EntryType::Split => EntryDirection::Debit,
            EntryType::Deposit
            | EntryType::SurrenderRefund
            | EntryType::Payout
            | EntryType::Reversal => EntryDirection::Credit,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::Deposit => write!(f, "deposit"),
            EntryType::Bet => write!(f, "bet"),
            EntryType::DoubleDown => write!(f, "double_down"),
            EntryType::Split => write!(f, "split"),
            EntryType::SurrenderRefund => write!(f, "surrender_refund"),
            EntryType::Payout => write!(f, "payout"),
            EntryType::Reversal => write!(f, "reversal"),
        }
    }
}
