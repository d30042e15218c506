//! Error types shared by the engine, the ledger, and table seating.

use thiserror::Error;

use crate::game::entities::{Chips, PlayerId, SeatNumber};

/// Errors returned by every fallible engine operation.
///
/// All variants are recoverable. An operation that returns one of these
/// has not mutated balance, bet, seating, or any card sequence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlackjackError {
    /// No player is stored under the identifier
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    /// A player is already stored under the identifier
    #[error("Player {0} already exists")]
    PlayerAlreadyExists(PlayerId),

    /// Not enough balance to cover a bet or re-debit
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: Chips, required: Chips },

    /// Amount must not be negative
    #[error("Negative amount: {0}")]
    NegativeAmount(Chips),

    /// Action precondition violated or action unknown
    #[error("Illegal action: {reason}")]
    IllegalAction { reason: String },

    /// Seat already has an occupant
    #[error("Seat {0} is already occupied")]
    SeatOccupied(SeatNumber),

    /// Seat number outside the table's seat range
    #[error("Seat {seat} does not exist (seats 1-{max_seats})")]
    InvalidSeat { seat: SeatNumber, max_seats: usize },

    /// The shoe is empty and could not be rebuilt
    #[error("Shoe exhausted")]
    ShoeExhausted,
}

impl BlackjackError {
    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalAction {
            reason: reason.into(),
        }
    }

    /// Get a client-safe error message that doesn't leak player identifiers
    pub fn client_message(&self) -> String {
        match self {
            BlackjackError::PlayerNotFound(_) => "Player not found".to_string(),
            BlackjackError::PlayerAlreadyExists(_) => "Player already exists".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for engine operations
pub type BlackjackResult<T> = Result<T, BlackjackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_balance_display() {
        let err = BlackjackError::InsufficientBalance {
            available: 100,
            required: 225,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: available 100, required 225"
        );
    }

    #[test]
    fn test_client_message_redacts_player_id() {
        let err = BlackjackError::PlayerNotFound(4242);
        assert!(err.to_string().contains("4242"));
        assert!(!err.client_message().contains("4242"));
    }

    #[test]
    fn test_client_message_passes_through_other_errors() {
        let err = BlackjackError::illegal("hand is terminal");
        assert_eq!(err.client_message(), "Illegal action: hand is terminal");
    }
}
