//! Seat bookkeeping for a single table.

use log::debug;
use std::collections::BTreeMap;

use crate::{
    errors::{BlackjackError, BlackjackResult},
    game::entities::{PlayerId, SeatNumber},
};

/// Seat number to occupant. Seats run `1..=max_seats`.
#[derive(Debug, Clone)]
pub struct Seating {
    max_seats: usize,
    seats: BTreeMap<SeatNumber, PlayerId>,
}

impl Seating {
    pub fn new(max_seats: usize) -> Self {
        Self {
            max_seats,
            seats: BTreeMap::new(),
        }
    }

    /// Put `player_id` in `seat`.
    ///
    /// A player already seated elsewhere moves; sitting down in one's own
    /// seat again is a no-op.
    ///
    /// # Errors
    ///
    /// * `BlackjackError::InvalidSeat` - `seat` is outside `1..=max_seats`
    /// * `BlackjackError::SeatOccupied` - someone else holds `seat`
    pub fn seat(&mut self, seat: SeatNumber, player_id: PlayerId) -> BlackjackResult<()> {
        if seat == 0 || seat > self.max_seats {
            return Err(BlackjackError::InvalidSeat {
                seat,
                max_seats: self.max_seats,
            });
        }
        match self.seats.get(&seat) {
            Some(&occupant) if occupant == player_id => return Ok(()),
            Some(_) => return Err(BlackjackError::SeatOccupied(seat)),
            None => {}
        }

        if let Some(previous) = self.seat_of(player_id) {
            self.seats.remove(&previous);
            debug!("Player {player_id} moves from seat {previous} to seat {seat}");
        } else {
            debug!("Player {player_id} takes seat {seat}");
        }
        self.seats.insert(seat, player_id);
        Ok(())
    }

    /// Free whatever seat `player_id` holds. Returns the freed seat.
    pub fn leave(&mut self, player_id: PlayerId) -> Option<SeatNumber> {
        let seat = self.seat_of(player_id)?;
        self.seats.remove(&seat);
        debug!("Player {player_id} leaves seat {seat}");
        Some(seat)
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<SeatNumber> {
        self.seats
            .iter()
            .find_map(|(&seat, &occupant)| (occupant == player_id).then_some(seat))
    }

    /// Occupied seats in seat order.
    pub fn seated(&self) -> impl Iterator<Item = (SeatNumber, PlayerId)> + '_ {
        self.seats.iter().map(|(&seat, &player_id)| (seat, player_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_empty_seat() {
        let mut seating = Seating::new(7);
        seating.seat(3, 10).unwrap();
        assert_eq!(seating.seat_of(10), Some(3));
    }

    #[test]
    fn test_occupied_seat_is_rejected() {
        let mut seating = Seating::new(7);
        seating.seat(1, 10).unwrap();
        assert_eq!(seating.seat(1, 11), Err(BlackjackError::SeatOccupied(1)));
        assert_eq!(seating.seat_of(10), Some(1));
        assert_eq!(seating.seat_of(11), None);
    }

    #[test]
    fn test_reseating_same_player_is_noop() {
        let mut seating = Seating::new(7);
        seating.seat(2, 10).unwrap();
        seating.seat(2, 10).unwrap();
        assert_eq!(seating.seated().count(), 1);
    }

    #[test]
    fn test_seat_outside_range() {
        let mut seating = Seating::new(7);
        assert_eq!(
            seating.seat(0, 1),
            Err(BlackjackError::InvalidSeat {
                seat: 0,
                max_seats: 7
            })
        );
        assert!(seating.seat(8, 1).is_err());
        assert!(seating.seat(7, 1).is_ok());
    }

    #[test]
    fn test_player_moves_seats() {
        let mut seating = Seating::new(7);
        seating.seat(1, 10).unwrap();
        seating.seat(5, 10).unwrap();
        assert_eq!(seating.seated().collect::<Vec<_>>(), vec![(5, 10)]);
    }

    #[test]
    fn test_leave_frees_seat() {
        let mut seating = Seating::new(7);
        seating.seat(4, 10).unwrap();
        assert_eq!(seating.leave(10), Some(4));
        assert_eq!(seating.leave(10), None);
        seating.seat(4, 11).unwrap();
    }

    #[test]
    fn test_seated_in_seat_order() {
        let mut seating = Seating::new(3);
        seating.seat(3, 30).unwrap();
        seating.seat(1, 10).unwrap();
        seating.seat(2, 20).unwrap();
        let order: Vec<_> = seating.seated().collect();
        assert_eq!(order, vec![(1, 10), (2, 20), (3, 30)]);
    }
}
