//! Per-hand action state machine.
//!
//! A hand moves `AwaitingBet → Dealt → InPlay` and ends in one of the
//! terminal states (`Stood`, `Bust`, `Blackjack`, `Surrendered`,
//! `Doubled`). Split forks one live hand into two.
//!
//! Each action is its own type implementing [`PlayerAction`]; [`Action`]
//! dispatches to them with `enum_dispatch`. An action checks every
//! precondition before touching anything, so a rejected action leaves
//! the player exactly as it found them.

use enum_dispatch::enum_dispatch;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

use super::{
    dealer::Dealer,
    entities::{Chips, HandIndex},
    hand::{Hand, HandStatus},
};
use crate::{
    errors::{BlackjackError, BlackjackResult},
    wallet::{EntryType, Ledger, Player},
};

/// Behaviour shared by every player action.
#[enum_dispatch]
pub trait PlayerAction {
    fn name(&self) -> &'static str;

    /// Check action-specific preconditions. The hand is known to be live.
    fn validate(&self, player: &Player, hand: &Hand) -> BlackjackResult<()>;

    /// Carry out the action on a hand that passed `validate`.
    fn execute(
        &self,
        engine: &ActionEngine,
        player: &mut Player,
        index: HandIndex,
    ) -> BlackjackResult<()>;
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Hit;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Stand;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Double;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Split;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Surrender;

#[enum_dispatch(PlayerAction)]
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
    Surrender,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Hit(Hit),
        Action::Stand(Stand),
        Action::Double(Double),
        Action::Split(Split),
        Action::Surrender(Surrender),
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Action {
    type Err = BlackjackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.name() == name)
            .ok_or_else(|| BlackjackError::illegal(format!("action {s} is not allowed")))
    }
}

fn require_two_cards(hand: &Hand, action: &str) -> BlackjackResult<()> {
    if hand.len() == 2 {
        Ok(())
    } else {
        Err(BlackjackError::illegal(format!(
            "can only {action} on two cards, hand has {}",
            hand.len()
        )))
    }
}

fn require_cover(player: &Player, amount: Chips, action: &str) -> BlackjackResult<()> {
    if player.balance() >= amount {
        Ok(())
    } else {
        Err(BlackjackError::illegal(format!(
            "{action} needs {amount} more, balance is {}",
            player.balance()
        )))
    }
}

fn live_hand(player: &mut Player, index: HandIndex) -> BlackjackResult<&mut Hand> {
    player
        .hand_mut(index)
        .ok_or_else(|| BlackjackError::illegal(format!("no hand at index {index}")))
}

impl PlayerAction for Hit {
    fn name(&self) -> &'static str {
        "hit"
    }

    fn validate(&self, _player: &Player, _hand: &Hand) -> BlackjackResult<()> {
        Ok(())
    }

    fn execute(
        &self,
        engine: &ActionEngine,
        player: &mut Player,
        index: HandIndex,
    ) -> BlackjackResult<()> {
        let card = engine.dealer.draw()?;
        let hand = live_hand(player, index)?;
        hand.add_card(card)?;
        hand.settle_after_draw();
        Ok(())
    }
}

impl PlayerAction for Stand {
    fn name(&self) -> &'static str {
        "stand"
    }

    fn validate(&self, _player: &Player, _hand: &Hand) -> BlackjackResult<()> {
        Ok(())
    }

    fn execute(
        &self,
        _engine: &ActionEngine,
        player: &mut Player,
        index: HandIndex,
    ) -> BlackjackResult<()> {
        live_hand(player, index)?.status = HandStatus::Stood;
        Ok(())
    }
}

impl PlayerAction for Double {
    fn name(&self) -> &'static str {
        "double"
    }

    fn validate(&self, player: &Player, hand: &Hand) -> BlackjackResult<()> {
        require_two_cards(hand, "double")?;
        require_cover(player, hand.bet, "double")
    }

    fn execute(
        &self,
        engine: &ActionEngine,
        player: &mut Player,
        index: HandIndex,
    ) -> BlackjackResult<()> {
        let stake = live_hand(player, index)?.bet;
        engine.ledger.debit(player, stake, EntryType::DoubleDown)?;
        let card = match engine.dealer.draw() {
            Ok(card) => card,
            Err(e) => {
                engine.ledger.credit(player, stake, EntryType::Reversal)?;
                return Err(e);
            }
        };

        let hand = live_hand(player, index)?;
        hand.bet += stake;
        hand.add_card(card)?;
        hand.status = if hand.evaluate().is_bust {
            HandStatus::Bust
        } else {
            HandStatus::Doubled
        };
        Ok(())
    }
}

impl PlayerAction for Split {
    fn name(&self) -> &'static str {
        "split"
    }

    fn validate(&self, player: &Player, hand: &Hand) -> BlackjackResult<()> {
        if !hand.evaluate().is_splittable {
            return Err(BlackjackError::illegal(
                "can only split two cards of equal value",
            ));
        }
        require_cover(player, hand.bet, "split")
    }

    fn execute(
        &self,
        engine: &ActionEngine,
        player: &mut Player,
        index: HandIndex,
    ) -> BlackjackResult<()> {
        let stake = live_hand(player, index)?.bet;
        engine.ledger.debit(player, stake, EntryType::Split)?;
        let [first_draw, second_draw] = match engine.dealer.draw_pair() {
            Ok(cards) => cards,
            Err(e) => {
                engine.ledger.credit(player, stake, EntryType::Reversal)?;
                return Err(e);
            }
        };

        let hand = live_hand(player, index)?;
        let moved = hand
            .take_split_card()
            .ok_or_else(|| BlackjackError::illegal("can only split two cards"))?;
        hand.add_card(first_draw)?;
        hand.status = HandStatus::InPlay;
        hand.from_split = true;

        let forked = Hand::from_parts(vec![moved, second_draw], stake, HandStatus::InPlay, true);
        player.insert_hand(index + 1, forked);
        Ok(())
    }
}

impl PlayerAction for Surrender {
    fn name(&self) -> &'static str {
        "surrender"
    }

    fn validate(&self, _player: &Player, hand: &Hand) -> BlackjackResult<()> {
        require_two_cards(hand, "surrender")
    }

    fn execute(
        &self,
        engine: &ActionEngine,
        player: &mut Player,
        index: HandIndex,
    ) -> BlackjackResult<()> {
        // Half the stake is forfeited; an odd chip stays with the house.
        let refund = live_hand(player, index)?.bet / 2;
        engine.ledger.credit(player, refund, EntryType::SurrenderRefund)?;
        live_hand(player, index)?.status = HandStatus::Surrendered;
        Ok(())
    }
}

/// Validates and executes actions against a player's hands.
#[derive(Debug, Clone)]
pub struct ActionEngine {
    dealer: Arc<Dealer>,
    ledger: Arc<Ledger>,
}

impl ActionEngine {
    pub fn new(dealer: Arc<Dealer>, ledger: Arc<Ledger>) -> Self {
        Self { dealer, ledger }
    }

    /// Apply `action` to the hand at `index`.
    ///
    /// # Errors
    ///
    /// * `BlackjackError::IllegalAction` - no such hand, hand not dealt or
    ///   already terminal, or an action-specific precondition fails
    /// * `BlackjackError::ShoeExhausted` - no card could be drawn; the
    ///   hand and balance are as before the call
    pub fn apply(
        &self,
        action: Action,
        player: &mut Player,
        index: HandIndex,
    ) -> BlackjackResult<()> {
        if let Err(e) = Self::check(action, player, index) {
            warn!("Player {} can't {action} hand {index}: {e}", player.id);
            return Err(e);
        }
        action.execute(self, player, index)?;
        if let Some(hand) = player.hand(index) {
            debug!("Player {} {action}s hand {index}: {hand} ({})", player.id, hand.status);
        }
        Ok(())
    }

    /// Parse `name` and apply it.
    pub fn apply_named(
        &self,
        name: &str,
        player: &mut Player,
        index: HandIndex,
    ) -> BlackjackResult<()> {
        self.apply(name.parse()?, player, index)
    }

    /// Actions whose preconditions hold for the hand at `index` right now.
    pub fn available_actions(&self, player: &Player, index: HandIndex) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&action| Self::check(action, player, index).is_ok())
            .collect()
    }

    fn check(action: Action, player: &Player, index: HandIndex) -> BlackjackResult<()> {
        let hand = player
            .hand(index)
            .ok_or_else(|| BlackjackError::illegal(format!("no hand at index {index}")))?;
        match hand.status {
            HandStatus::Dealt | HandStatus::InPlay => action.validate(player, hand),
            HandStatus::AwaitingBet => Err(BlackjackError::illegal("hand has not been dealt")),
            status => Err(BlackjackError::illegal(format!("hand is {status}"))),
        }
    }
}
