//! Player storage seam.
//!
//! The engine never mints identifiers or talks to a database. It loads and
//! saves plain [`Player`] values by caller-supplied id through
//! [`PlayerRepository`]; a persistence layer plugs in its own implementation.
//! [`InMemoryPlayerRepository`] backs tests and the bots binary.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    errors::{BlackjackError, BlackjackResult},
    game::entities::PlayerId,
    wallet::Player,
};

/// Repository trait for player persistence
pub trait PlayerRepository: Send + Sync {
    /// Load a player by id
    ///
    /// # Errors
    ///
    /// * `BlackjackError::PlayerNotFound` - nothing stored under `id`
    fn load(&self, id: PlayerId) -> BlackjackResult<Player>;

    /// Store a new player
    ///
    /// # Errors
    ///
    /// * `BlackjackError::PlayerAlreadyExists` - `player.id` is taken
    fn insert(&self, player: Player) -> BlackjackResult<()>;

    /// Overwrite an existing player
    ///
    /// # Errors
    ///
    /// * `BlackjackError::PlayerNotFound` - nothing stored under `player.id`
    fn save(&self, player: &Player) -> BlackjackResult<()>;

    /// Every stored id, ascending
    fn ids(&self) -> Vec<PlayerId>;
}

/// In-memory player repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlayerRepository {
    players: Arc<Mutex<HashMap<PlayerId, Player>>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(self, player: Player) -> Self {
        self.players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(player.id, player);
        self
    }
}

impl PlayerRepository for InMemoryPlayerRepository {
    fn load(&self, id: PlayerId) -> BlackjackResult<Player> {
        self.players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(BlackjackError::PlayerNotFound(id))
    }

    fn insert(&self, player: Player) -> BlackjackResult<()> {
        let mut players = self.players.lock().unwrap_or_else(PoisonError::into_inner);
        if players.contains_key(&player.id) {
            return Err(BlackjackError::PlayerAlreadyExists(player.id));
        }
        players.insert(player.id, player);
        Ok(())
    }

    fn save(&self, player: &Player) -> BlackjackResult<()> {
        let mut players = self.players.lock().unwrap_or_else(PoisonError::into_inner);
        match players.get_mut(&player.id) {
            Some(stored) => {
                *stored = player.clone();
                Ok(())
            }
            None => Err(BlackjackError::PlayerNotFound(player.id)),
        }
    }

    fn ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<_> = self
            .players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }
}
