/// Cards in one standard deck.
pub const CARDS_PER_DECK: usize = 52;

/// Decks in a freshly built shoe unless configured otherwise.
pub const DEFAULT_NUM_DECKS: usize = 6;

/// Best total a hand can reach without busting.
pub const BLACKJACK: u8 = 21;

/// Difference between an Ace counted high (11) and low (1).
pub const ACE_DEMOTION: u8 = 10;

/// Dealer keeps drawing while below this total.
pub const DEALER_STANDS_ON: u8 = 17;

/// Default number of seats at a table. Seats are numbered from 1.
pub const DEFAULT_MAX_SEATS: usize = 7;

/// Upper bound on configurable seats.
pub const MAX_SEATS: usize = 12;
