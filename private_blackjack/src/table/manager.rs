//! Table manager: the composition root tying players, seats, the dealer,
//! the ledger, and the action engine into rounds.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::{config::TableConfig, seating::Seating};
use crate::{
    errors::{BlackjackError, BlackjackResult},
    game::{
        dealer::Dealer,
        entities::{Card, Chips, HandIndex, PlayerId, SeatNumber},
        hand::{Hand, HandStatus},
        settlement::{Outcome, settle_hand},
        shoe::Shoe,
        state_machine::{Action, ActionEngine},
    },
    repository::PlayerRepository,
    wallet::{EntryType, Ledger, LedgerEntry, Player},
};

/// Where the table is in its round cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundPhase {
    /// Taking bets and seat changes.
    #[default]
    Betting,
    /// Cards are out; players act on their hands.
    Playing,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundPhase::Betting => write!(f, "betting"),
            RoundPhase::Playing => write!(f, "playing"),
        }
    }
}

/// Settlement of one player hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    pub player_id: PlayerId,
    pub hand_index: HandIndex,
    pub hand: Hand,
    pub outcome: Outcome,
    /// Chips credited at settlement, stake included.
    pub payout: Chips,
}

/// Everything that happened when a round closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub dealer: Hand,
    pub results: Vec<HandResult>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Table manager
///
/// Every player operation runs under that player's lock, held from load
/// through validation and mutation to save. A failing operation never
/// saves, so the stored player is exactly as before the call.
///
/// Lock order is phase, then player, then seating.
pub struct TableManager {
    config: TableConfig,
    dealer: Arc<Dealer>,
    ledger: Arc<Ledger>,
    engine: ActionEngine,
    repository: Arc<dyn PlayerRepository>,
    seating: Mutex<Seating>,
    phase: Mutex<RoundPhase>,
    player_locks: Mutex<HashMap<PlayerId, Arc<Mutex<()>>>>,
}

impl TableManager {
    /// Create a new table manager
    ///
    /// # Arguments
    ///
    /// * `config` - Table configuration, assumed already validated
    /// * `repository` - Where players are loaded from and saved to
    pub fn new(config: TableConfig, repository: Arc<dyn PlayerRepository>) -> Self {
        let shoe = match config.shoe_seed {
            Some(seed) => Shoe::with_seed(config.num_decks, seed),
            None => Shoe::new(config.num_decks),
        };
        Self::with_shoe(config, shoe, repository)
    }

    /// Create a table manager dealing from a prepared shoe
    pub fn with_shoe(
        config: TableConfig,
        shoe: Shoe,
        repository: Arc<dyn PlayerRepository>,
    ) -> Self {
        let dealer = Arc::new(Dealer::new(shoe, config.dealer_hits_soft_17));
        let ledger = Arc::new(Ledger::new());
        let engine = ActionEngine::new(Arc::clone(&dealer), Arc::clone(&ledger));

        info!(
            "Table ready: {} decks, {} seats, blackjack pays {}",
            config.num_decks, config.max_seats, config.blackjack_payout
        );
        Self {
            seating: Mutex::new(Seating::new(config.max_seats)),
            config,
            dealer,
            ledger,
            engine,
            repository,
            phase: Mutex::new(RoundPhase::Betting),
            player_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn phase(&self) -> RoundPhase {
        *lock(&self.phase)
    }

    /// Journal of every chip movement at this table
    pub fn ledger_entries(&self, player_id: PlayerId) -> Vec<LedgerEntry> {
        self.ledger.entries_for(player_id)
    }

    /// The lock serializing operations on one player. Only stored players
    /// get an entry.
    fn player_lock(&self, player_id: PlayerId) -> BlackjackResult<Arc<Mutex<()>>> {
        let mut locks = lock(&self.player_locks);
        if let Some(player_lock) = locks.get(&player_id) {
            return Ok(Arc::clone(player_lock));
        }
        self.repository.load(player_id)?;
        Ok(Arc::clone(
            locks
                .entry(player_id)
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        ))
    }

    /// Run `f` on a freshly loaded player and save the result if it succeeds.
    fn with_player<T>(
        &self,
        player_id: PlayerId,
        f: impl FnOnce(&mut Player) -> BlackjackResult<T>,
    ) -> BlackjackResult<T> {
        let player_lock = self.player_lock(player_id)?;
        let _guard = lock(&player_lock);

        let mut player = self.repository.load(player_id)?;
        let value = f(&mut player)?;
        self.repository.save(&player)?;
        Ok(value)
    }

    /// Register a new player with an empty balance
    ///
    /// # Errors
    ///
    /// * `BlackjackError::PlayerAlreadyExists` - `id` is taken
    pub fn create_player(&self, id: PlayerId, name: &str) -> BlackjackResult<Player> {
        let player = Player::new(id, name);
        self.repository.insert(player.clone())?;
        info!("Created player {id} ({name})");
        Ok(player)
    }

    pub fn get_player(&self, id: PlayerId) -> BlackjackResult<Player> {
        self.repository.load(id)
    }

    pub fn all_players(&self) -> Vec<Player> {
        self.repository
            .ids()
            .into_iter()
            .filter_map(|id| self.repository.load(id).ok())
            .collect()
    }

    /// Credit chips to a player
    ///
    /// # Errors
    ///
    /// * `BlackjackError::PlayerNotFound` - unknown player
    /// * `BlackjackError::NegativeAmount` - `amount` is below zero
    pub fn add_balance(&self, player_id: PlayerId, amount: Chips) -> BlackjackResult<Player> {
        self.with_player(player_id, |player| {
            self.ledger.add_balance(player, amount)?;
            Ok(player.clone())
        })
    }

    /// Place a seated player's bet for the next round
    ///
    /// # Errors
    ///
    /// * `BlackjackError::PlayerNotFound` - unknown player
    /// * `BlackjackError::IllegalAction` - a round is being played, the
    ///   player isn't seated, or already bet
    /// * `BlackjackError::NegativeAmount` / `BlackjackError::InsufficientBalance`
    pub fn place_bet(&self, player_id: PlayerId, amount: Chips) -> BlackjackResult<Player> {
        let phase = lock(&self.phase);
        if *phase != RoundPhase::Betting {
            return Err(BlackjackError::illegal("bets are closed until the round ends"));
        }
        self.with_player(player_id, |player| {
            if player.seat.is_none() {
                return Err(BlackjackError::illegal("take a seat before betting"));
            }
            self.ledger.place_bet(player, amount)?;
            debug!("Player {player_id} bets {amount}");
            Ok(player.clone())
        })
    }

    /// Seat a player, moving them if they're already seated elsewhere
    ///
    /// # Errors
    ///
    /// * `BlackjackError::PlayerNotFound` - unknown player
    /// * `BlackjackError::InvalidSeat` / `BlackjackError::SeatOccupied`
    /// * `BlackjackError::IllegalAction` - the player has a bet out
    pub fn seat_player(&self, player_id: PlayerId, seat: SeatNumber) -> BlackjackResult<Player> {
        self.with_player(player_id, |player| {
            if player.in_round() {
                return Err(BlackjackError::illegal("can't change seats with a bet out"));
            }
            lock(&self.seating).seat(seat, player_id)?;
            player.seat = Some(seat);
            Ok(player.clone())
        })
    }

    /// Free a player's seat. Returns the seat they left, if any.
    ///
    /// # Errors
    ///
    /// * `BlackjackError::PlayerNotFound` - unknown player
    /// * `BlackjackError::IllegalAction` - the player has a bet out
    pub fn leave_seat(&self, player_id: PlayerId) -> BlackjackResult<Option<SeatNumber>> {
        self.with_player(player_id, |player| {
            if player.in_round() {
                return Err(BlackjackError::illegal("can't leave with a bet out"));
            }
            let seat = lock(&self.seating).leave(player_id);
            player.seat = None;
            Ok(seat)
        })
    }

    /// Seated players in seat order.
    pub fn seated(&self) -> Vec<(SeatNumber, PlayerId)> {
        lock(&self.seating).seated().collect()
    }

    /// The dealer's face-up card while a round is being played.
    pub fn dealer_up_card(&self) -> Option<Card> {
        self.dealer.up_card()
    }

    /// Close betting and deal two cards to every seated player holding a
    /// bet, in seat order, then two to the dealer.
    ///
    /// If the dealer holds a natural, every player hand that isn't one is
    /// stood immediately.
    ///
    /// # Returns
    ///
    /// * `BlackjackResult<Vec<PlayerId>>` - Players dealt in
    ///
    /// # Errors
    ///
    /// * `BlackjackError::IllegalAction` - a round is already being played,
    ///   or nobody has bet
    /// * `BlackjackError::ShoeExhausted` - the shoe can't cover every hand;
    ///   nobody is dealt and betting stays open
    pub fn start_round(&self) -> BlackjackResult<Vec<PlayerId>> {
        let mut phase = lock(&self.phase);
        if *phase != RoundPhase::Betting {
            return Err(BlackjackError::illegal("a round is already in progress"));
        }

        let mut locks = Vec::new();
        for (_, player_id) in self.seated() {
            if self.repository.load(player_id)?.in_round() {
                locks.push((player_id, self.player_lock(player_id)?));
            }
        }
        if locks.is_empty() {
            return Err(BlackjackError::illegal("no bets placed"));
        }

        // Hold every bettor for the whole deal so it lands all at once.
        let _guards: Vec<_> = locks.iter().map(|(_, player_lock)| lock(player_lock)).collect();
        let mut players = locks
            .iter()
            .map(|&(player_id, _)| self.repository.load(player_id))
            .collect::<BlackjackResult<Vec<_>>>()?;
        self.dealer.deal_round(&mut players)?;

        let dealer_hand = self.dealer.hand();
        if dealer_hand.evaluate().is_blackjack {
            info!("Dealer has blackjack: {dealer_hand}");
            for player in &mut players {
                if let Some(hand) = player.hand_mut(0) {
                    if hand.status == HandStatus::Dealt {
                        hand.status = HandStatus::Stood;
                    }
                }
            }
        }
        for player in &players {
            self.repository.save(player)?;
        }
        let bettors: Vec<PlayerId> = players.iter().map(|player| player.id).collect();

        *phase = RoundPhase::Playing;
        info!(
            "Round started with {} player(s), dealer shows {:?}",
            bettors.len(),
            self.dealer.up_card().map(|card| card.to_string())
        );
        Ok(bettors)
    }

    /// Apply a named action to one of a player's hands
    ///
    /// # Arguments
    ///
    /// * `action` - `hit`, `stand`, `double`, `split` or `surrender`
    /// * `player_id` - Acting player
    /// * `hand_index` - Position in the player's hand list
    ///
    /// # Errors
    ///
    /// * `BlackjackError::PlayerNotFound` - unknown player
    /// * `BlackjackError::IllegalAction` - no round in progress, unknown
    ///   action, or a failed precondition
    /// * `BlackjackError::ShoeExhausted`
    pub fn execute_action(
        &self,
        action: &str,
        player_id: PlayerId,
        hand_index: HandIndex,
    ) -> BlackjackResult<Player> {
        if self.phase() != RoundPhase::Playing {
            return Err(BlackjackError::illegal("no round in progress"));
        }
        self.with_player(player_id, |player| {
            self.engine.apply_named(action, player, hand_index)?;
            Ok(player.clone())
        })
    }

    /// Actions the player could take on a hand right now
    pub fn available_actions(
        &self,
        player_id: PlayerId,
        hand_index: HandIndex,
    ) -> BlackjackResult<Vec<Action>> {
        let player = self.repository.load(player_id)?;
        Ok(self.engine.available_actions(&player, hand_index))
    }

    /// Play the dealer's hand, settle every player hand, and reopen betting.
    ///
    /// The dealer draws only if some player hand could still win, i.e. not
    /// every hand is bust or surrendered.
    ///
    /// # Errors
    ///
    /// * `BlackjackError::IllegalAction` - no round in progress, or a
    ///   player hand is still live
    /// * `BlackjackError::ShoeExhausted`
    pub fn finish_round(&self) -> BlackjackResult<RoundSummary> {
        let mut phase = lock(&self.phase);
        if *phase != RoundPhase::Playing {
            return Err(BlackjackError::illegal("no round in progress"));
        }

        let mut players = Vec::new();
        for (_, player_id) in self.seated() {
            let player = self.repository.load(player_id)?;
            if !player.in_round() {
                continue;
            }
            if let Some(index) = player.hands().iter().position(|hand| !hand.is_terminal()) {
                warn!("Can't finish round: player {player_id} hand {index} still in play");
                return Err(BlackjackError::illegal(format!(
                    "player {player_id} hand {index} is still in play"
                )));
            }
            players.push(player);
        }

        let dealer_must_play = players.iter().flat_map(|player| player.hands()).any(|hand| {
            !matches!(hand.status, HandStatus::Bust | HandStatus::Surrendered)
        });
        let dealer = if dealer_must_play {
            self.dealer.play_out()?
        } else {
            self.dealer.hand()
        };
        let dealer_eval = dealer.evaluate();

        let mut results = Vec::new();
        for player in players {
            let settled = self.with_player(player.id, |player| {
                let mut settled = Vec::with_capacity(player.hands().len());
                let hands = player.hands().to_vec();
                for (hand_index, hand) in hands.into_iter().enumerate() {
                    let settlement = settle_hand(&hand, &dealer_eval, self.config.blackjack_payout);
                    if settlement.payout > 0 {
                        self.ledger
                            .credit(player, settlement.payout, EntryType::Payout)?;
                    }
                    debug!(
                        "Player {} hand {hand_index} {hand}: {}",
                        player.id, settlement.outcome
                    );
                    settled.push(HandResult {
                        player_id: player.id,
                        hand_index,
                        hand,
                        outcome: settlement.outcome,
                        payout: settlement.payout,
                    });
                }
                player.close_round();
                Ok(settled)
            })?;
            results.extend(settled);
        }

        self.dealer.reset_hand();
        *phase = RoundPhase::Betting;
        info!(
            "Round finished: dealer {dealer}, {} hand(s) settled, {} cards left in shoe",
            results.len(),
            self.dealer.remaining()
        );
        Ok(RoundSummary { dealer, results })
    }
}
