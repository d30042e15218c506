//! Hand Evaluation Example
//!
//! Demonstrates scoring blackjack hands and settling them against a dealer.

use private_blackjack::{
    Card, Hand, HandStatus, PayoutRatio, Rank, Suit, evaluate, game::settlement::settle_hand,
};

fn cards(ranks: &[Rank]) -> Vec<Card> {
    ranks
        .iter()
        .zip(Suit::ALL.into_iter().cycle())
        .map(|(&rank, suit)| Card::new(rank, suit))
        .collect()
}

fn main() {
    println!("=== Blackjack Hand Evaluation Example ===\n");

    // Example 1: How common hands score
    println!("Example 1: Scoring hands");
    let examples = vec![
        ("Natural", vec![Rank::Ace, Rank::King]),
        ("Soft 14", vec![Rank::Ace, Rank::Three]),
        ("Soft 19", vec![Rank::Six, Rank::Two, Rank::Ace]),
        ("Hard 12", vec![Rank::Seven, Rank::Four, Rank::Ace]),
        ("Three Aces", vec![Rank::Nine, Rank::Ace, Rank::Ace, Rank::Ace]),
        ("Bust", vec![Rank::Ten, Rank::Five, Rank::Seven]),
    ];

    for (name, ranks) in &examples {
        let hand = cards(ranks);
        let eval = evaluate(&hand);
        let shown: Vec<_> = hand.iter().map(ToString::to_string).collect();
        println!(
            "{name:>10}: [{}] -> {} (blackjack: {}, bust: {})",
            shown.join(" "),
            eval.value,
            eval.is_blackjack,
            eval.is_bust
        );
    }

    // Example 2: Which pairs can be split
    println!("\nExample 2: Split eligibility");
    for ranks in [
        [Rank::Ten, Rank::Ten],
        [Rank::Ten, Rank::Jack],
        [Rank::Nine, Rank::Eight],
        [Rank::Ace, Rank::Ace],
    ] {
        let eval = evaluate(&cards(&ranks));
        println!("{:?}: splittable = {}", ranks, eval.is_splittable);
    }

    // Example 3: Settling against a dealer 19
    println!("\nExample 3: Settling a 100 chip bet against dealer 19");
    let dealer = evaluate(&cards(&[Rank::Ten, Rank::Nine]));
    let hands = vec![
        ("Natural", Hand::from_parts(cards(&[Rank::Ace, Rank::Queen]), 100, HandStatus::Blackjack, false)),
        ("Split 21", Hand::from_parts(cards(&[Rank::Ace, Rank::Queen]), 100, HandStatus::Stood, true)),
        ("Hard 20", Hand::from_parts(cards(&[Rank::King, Rank::Queen]), 100, HandStatus::Stood, false)),
        ("Soft 19", Hand::from_parts(cards(&[Rank::Ace, Rank::Eight]), 100, HandStatus::Stood, false)),
        ("Hard 18", Hand::from_parts(cards(&[Rank::Ten, Rank::Eight]), 100, HandStatus::Stood, false)),
    ];

    for (name, hand) in &hands {
        let result = settle_hand(hand, &dealer, PayoutRatio::default());
        println!("{name:>10}: {} -> {} (paid {})", hand, result.outcome, result.payout);
    }

    println!("\n=== End of Hand Evaluation Example ===");
}
