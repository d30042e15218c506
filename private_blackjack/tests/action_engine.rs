//! Action engine integration tests against stacked shoes.

use private_blackjack::{
    Action, ActionEngine, BlackjackError, Card, Dealer, HandStatus, Ledger, Player, Rank, Shoe,
    Suit, wallet::EntryType,
};
use std::sync::Arc;

/// Shoe that deals the player's first two `ranks`, a pair of sevens to
/// the dealer, then the rest of `ranks` in order, then rebuilds from
/// `num_decks`.
fn stacked(num_decks: usize, ranks: &[Rank]) -> Shoe {
    let mut order = ranks.to_vec();
    let opening = order.len().min(2);
    order.splice(opening..opening, [Rank::Seven, Rank::Seven]);
    let mut cards: Vec<Card> = order
        .iter()
        .zip(Suit::ALL.into_iter().cycle())
        .map(|(&rank, suit)| Card::new(rank, suit))
        .collect();
    cards.reverse();
    Shoe::from_cards(num_decks, cards, 0)
}

struct Fixture {
    dealer: Arc<Dealer>,
    ledger: Arc<Ledger>,
    engine: ActionEngine,
}

fn fixture(shoe: Shoe) -> Fixture {
    let dealer = Arc::new(Dealer::new(shoe, false));
    let ledger = Arc::new(Ledger::new());
    let engine = ActionEngine::new(Arc::clone(&dealer), Arc::clone(&ledger));
    Fixture {
        dealer,
        ledger,
        engine,
    }
}

/// Funded player with `bet` placed and the opening two cards dealt.
fn dealt_player(fx: &Fixture, balance: i64, bet: i64) -> Player {
    let mut player = Player::new(1, "alice");
    fx.ledger.add_balance(&mut player, balance).unwrap();
    fx.ledger.place_bet(&mut player, bet).unwrap();
    fx.dealer
        .deal_round(std::slice::from_mut(&mut player))
        .unwrap();
    player
}

fn ranks(player: &Player, index: usize) -> Vec<Rank> {
    player.hands()[index]
        .cards()
        .iter()
        .map(|card| card.rank)
        .collect()
}

fn act(name: &str) -> Action {
    name.parse().unwrap()
}

#[test]
fn test_split_eights_forks_two_hands() {
    let fx = fixture(stacked(6, &[Rank::Eight, Rank::Eight, Rank::Three, Rank::King]));
    let mut player = dealt_player(&fx, 500, 100);
    assert!(player.hands()[0].evaluate().is_splittable);

    fx.engine.apply(act("split"), &mut player, 0).unwrap();

    assert_eq!(player.balance(), 300);
    assert_eq!(player.hands().len(), 2);
    assert_eq!(ranks(&player, 0), vec![Rank::Eight, Rank::Three]);
    assert_eq!(ranks(&player, 1), vec![Rank::Eight, Rank::King]);
    assert!(player.hands().iter().all(|h| h.status == HandStatus::InPlay));

    let types: Vec<_> = fx
        .ledger
        .entries_for(1)
        .iter()
        .map(|entry| entry.entry_type)
        .collect();
    assert_eq!(types, vec![EntryType::Deposit, EntryType::Bet, EntryType::Split]);
}

#[test]
fn test_split_hands_play_independently() {
    let fx = fixture(stacked(
        6,
        &[Rank::Eight, Rank::Eight, Rank::Three, Rank::King, Rank::Nine],
    ));
    let mut player = dealt_player(&fx, 500, 100);
    fx.engine.apply(act("split"), &mut player, 0).unwrap();

    fx.engine.apply(act("stand"), &mut player, 1).unwrap();
    fx.engine.apply(act("hit"), &mut player, 0).unwrap();

    assert_eq!(player.hands()[0].evaluate().total(), 20);
    assert_eq!(player.hands()[0].status, HandStatus::InPlay);
    assert_eq!(player.hands()[1].status, HandStatus::Stood);
    assert!(fx.engine.apply(act("hit"), &mut player, 1).is_err());
}

#[test]
fn test_resplit() {
    let fx = fixture(stacked(
        6,
        &[Rank::Eight, Rank::Eight, Rank::Eight, Rank::Three, Rank::Two, Rank::Ten],
    ));
    let mut player = dealt_player(&fx, 1_000, 100);
    fx.engine.apply(act("split"), &mut player, 0).unwrap();
    assert_eq!(ranks(&player, 0), vec![Rank::Eight, Rank::Eight]);

    fx.engine.apply(act("split"), &mut player, 0).unwrap();
    assert_eq!(player.hands().len(), 3);
    assert_eq!(ranks(&player, 0), vec![Rank::Eight, Rank::Two]);
    assert_eq!(ranks(&player, 1), vec![Rank::Eight, Rank::Ten]);
    assert_eq!(ranks(&player, 2), vec![Rank::Eight, Rank::Three]);
    assert_eq!(player.balance(), 700);
}

#[test]
fn test_split_aces_to_twenty_one_is_not_a_natural() {
    let fx = fixture(stacked(6, &[Rank::Ace, Rank::Ace, Rank::King, Rank::Five]));
    let mut player = dealt_player(&fx, 500, 100);
    fx.engine.apply(act("split"), &mut player, 0).unwrap();

    let hand = &player.hands()[0];
    assert_eq!(hand.evaluate().total(), 21);
    assert_eq!(hand.status, HandStatus::InPlay);
    assert!(hand.from_split);
}

#[test]
fn test_split_ten_and_jack() {
    let fx = fixture(stacked(6, &[Rank::Ten, Rank::Jack, Rank::Two, Rank::Three]));
    let mut player = dealt_player(&fx, 500, 50);
    fx.engine.apply(act("split"), &mut player, 0).unwrap();
    assert_eq!(ranks(&player, 0), vec![Rank::Ten, Rank::Two]);
    assert_eq!(ranks(&player, 1), vec![Rank::Jack, Rank::Three]);
}

#[test]
fn test_split_after_hit_is_illegal() {
    let fx = fixture(stacked(6, &[Rank::Two, Rank::Two, Rank::Two]));
    let mut player = dealt_player(&fx, 500, 50);
    fx.engine.apply(act("hit"), &mut player, 0).unwrap();
    let before = player.clone();

    assert!(matches!(
        fx.engine.apply(act("split"), &mut player, 0),
        Err(BlackjackError::IllegalAction { .. })
    ));
    assert_eq!(player, before);
}

#[test]
fn test_double_to_bust() {
    let fx = fixture(stacked(6, &[Rank::Ten, Rank::Six, Rank::King]));
    let mut player = dealt_player(&fx, 500, 100);
    fx.engine.apply(act("double"), &mut player, 0).unwrap();

    let hand = &player.hands()[0];
    assert_eq!(hand.status, HandStatus::Bust);
    assert_eq!(hand.bet, 200);
    assert_eq!(player.balance(), 300);
}

#[test]
fn test_double_with_exact_balance() {
    let fx = fixture(stacked(6, &[Rank::Six, Rank::Five, Rank::Ten]));
    let mut player = dealt_player(&fx, 200, 100);
    fx.engine.apply(act("double"), &mut player, 0).unwrap();
    assert_eq!(player.balance(), 0);
    assert_eq!(player.hands()[0].status, HandStatus::Doubled);
    assert_eq!(player.hands()[0].evaluate().total(), 21);
}

#[test]
fn test_double_rolls_back_when_shoe_is_empty() {
    // Zero decks: nothing to rebuild once the two dealt cards are gone
    let fx = fixture(stacked(0, &[Rank::Six, Rank::Five]));
    let mut player = dealt_player(&fx, 500, 100);
    let before = player.clone();

    assert_eq!(
        fx.engine.apply(act("double"), &mut player, 0),
        Err(BlackjackError::ShoeExhausted)
    );
    assert_eq!(player, before);

    let entries = fx.ledger.entries_for(1);
    let last_two: Vec<_> = entries[entries.len() - 2..]
        .iter()
        .map(|entry| (entry.entry_type, entry.amount))
        .collect();
    assert_eq!(
        last_two,
        vec![(EntryType::DoubleDown, 100), (EntryType::Reversal, 100)]
    );
}

#[test]
fn test_split_rolls_back_when_shoe_is_empty() {
    let fx = fixture(stacked(0, &[Rank::Nine, Rank::Nine]));
    let mut player = dealt_player(&fx, 500, 100);
    let before = player.clone();

    assert!(fx.engine.apply(act("split"), &mut player, 0).is_err());
    assert_eq!(player, before);
    assert_eq!(player.hands().len(), 1);
}

#[test]
fn test_hit_on_empty_shoe_changes_nothing() {
    let fx = fixture(stacked(0, &[Rank::Two, Rank::Three]));
    let mut player = dealt_player(&fx, 500, 100);
    let before = player.clone();
    assert_eq!(
        fx.engine.apply(act("hit"), &mut player, 0),
        Err(BlackjackError::ShoeExhausted)
    );
    assert_eq!(player, before);
}

#[test]
fn test_surrender_after_split_forfeits_half_of_that_hand() {
    let fx = fixture(stacked(6, &[Rank::Eight, Rank::Eight, Rank::Eight, Rank::Two]));
    let mut player = dealt_player(&fx, 500, 100);
    fx.engine.apply(act("split"), &mut player, 0).unwrap();
    fx.engine.apply(act("surrender"), &mut player, 0).unwrap();

    assert_eq!(player.balance(), 350);
    assert_eq!(player.hands()[0].status, HandStatus::Surrendered);
    assert_eq!(player.hands()[1].status, HandStatus::InPlay);
}

#[test]
fn test_unknown_action_name() {
    let fx = fixture(stacked(6, &[Rank::Two, Rank::Three]));
    let mut player = dealt_player(&fx, 500, 100);
    let before = player.clone();
    assert!(matches!(
        fx.engine.apply_named("insurance", &mut player, 0),
        Err(BlackjackError::IllegalAction { .. })
    ));
    assert_eq!(player, before);
}

#[test]
fn test_natural_is_terminal_on_deal() {
    let fx = fixture(stacked(6, &[Rank::Ace, Rank::Queen]));
    let mut player = dealt_player(&fx, 500, 100);
    assert_eq!(player.hands()[0].status, HandStatus::Blackjack);
    assert!(fx.engine.apply(act("hit"), &mut player, 0).is_err());
}
