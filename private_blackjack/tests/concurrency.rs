//! Shared dealer and table access from many threads.

use private_blackjack::{
    BlackjackError, Card, Dealer, HandStatus, InMemoryPlayerRepository, Rank, Shoe, Suit,
    TableConfig, TableManager, wallet::EntryDirection,
};
use std::{
    collections::HashMap,
    sync::{Arc, Barrier},
    thread,
};

#[test]
fn test_concurrent_draws_never_duplicate() {
    let dealer = Arc::new(Dealer::new(Shoe::with_seed(6, 17), false));
    let threads = 8;
    let per_thread = 312 / threads;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let dealer = Arc::clone(&dealer);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..per_thread)
                    .map(|_| dealer.draw().unwrap())
                    .collect::<Vec<Card>>()
            })
        })
        .collect();

    let mut counts: HashMap<Card, usize> = HashMap::new();
    for handle in handles {
        for card in handle.join().unwrap() {
            *counts.entry(card).or_default() += 1;
        }
    }
    assert_eq!(counts.len(), 52);
    assert!(counts.values().all(|&n| n == 6));
    assert_eq!(dealer.remaining(), 0);
}

#[test]
fn test_draw_pairs_are_consecutive() {
    let cards: Vec<Card> = (0..40)
        .map(|i| Card::new(Rank::ALL[i % 13], Suit::ALL[(i / 13) % 4]))
        .collect();
    let expected: Vec<Card> = cards.iter().rev().copied().collect();
    let dealer = Arc::new(Dealer::new(Shoe::from_cards(1, cards, 0), false));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dealer = Arc::clone(&dealer);
            thread::spawn(move || (0..5).map(|_| dealer.draw_pair().unwrap()).collect::<Vec<_>>())
        })
        .collect();

    // Each pair is two adjacent positions of the stacked order
    for handle in handles {
        for [first, second] in handle.join().unwrap() {
            let at = expected.iter().position(|&c| c == first).unwrap();
            assert_eq!(expected[at + 1], second);
            assert_eq!(at % 2, 0);
        }
    }
}

fn table() -> Arc<TableManager> {
    let config = TableConfig {
        shoe_seed: Some(99),
        ..TableConfig::default()
    };
    Arc::new(TableManager::new(
        config,
        Arc::new(InMemoryPlayerRepository::new()),
    ))
}

#[test]
fn test_racing_bets_debit_once() {
    let table = table();
    table.create_player(1, "alice").unwrap();
    table.add_balance(1, 100).unwrap();
    table.seat_player(1, 1).unwrap();

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let table = Arc::clone(&table);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                table.place_bet(1, 60).is_ok()
            })
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|&ok| ok)
        .count();

    assert_eq!(successes, 1);
    let player = table.get_player(1).unwrap();
    assert_eq!(player.balance(), 40);
    assert_eq!(player.bet(), 60);
}

#[test]
fn test_racing_actions_on_one_hand() {
    let table = table();
    table.create_player(1, "alice").unwrap();
    table.add_balance(1, 1_000).unwrap();
    table.seat_player(1, 1).unwrap();
    table.place_bet(1, 100).unwrap();
    table.start_round().unwrap();

    let dealt = table.get_player(1).unwrap();
    if dealt.hands()[0].status != HandStatus::Dealt {
        // Natural on either side; nothing to race over
        return;
    }

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let table = Arc::clone(&table);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                table.execute_action("double", 1, 0)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().all(|r| match r {
        Ok(_) => true,
        Err(e) => matches!(e, BlackjackError::IllegalAction { .. }),
    }));

    let player = table.get_player(1).unwrap();
    assert_eq!(player.balance(), 800);
    assert_eq!(player.hands()[0].len(), 3);
    assert_eq!(player.hands()[0].bet, 200);
}

#[test]
fn test_players_act_in_parallel() {
    let table = table();
    let ids: Vec<i64> = (1..=6).collect();
    for (seat, &id) in (1..).zip(&ids) {
        table.create_player(id, &format!("p{id}")).unwrap();
        table.add_balance(id, 500).unwrap();
        table.seat_player(id, seat).unwrap();
        table.place_bet(id, 50).unwrap();
    }
    table.start_round().unwrap();

    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                // Hit to 17 or more, then stand
                loop {
                    let player = table.get_player(id).unwrap();
                    let hand = &player.hands()[0];
                    if hand.is_terminal() {
                        break;
                    }
                    let action = if hand.evaluate().total() < 17 { "hit" } else { "stand" };
                    table.execute_action(action, id, 0).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let summary = table.finish_round().unwrap();
    assert_eq!(summary.results.len(), ids.len());

    // Every player's balance is exactly what their journal says
    for &id in &ids {
        let journal: i64 = table
            .ledger_entries(id)
            .iter()
            .map(|entry| match entry.direction {
                EntryDirection::Credit => entry.amount,
                EntryDirection::Debit => -entry.amount,
            })
            .sum();
        assert_eq!(journal, table.get_player(id).unwrap().balance());
    }
}
