//! Basic-strategy bots playing rounds at a single blackjack table.
//!
//! This binary is the composition root: it builds a `TableManager` over an
//! in-memory player store, seats the bots, and plays rounds until the
//! configured count is reached, every bot is broke, or Ctrl+C is pressed.

mod config;
mod strategy;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::{Error, anyhow};
use ctrlc::set_handler;
use log::{debug, info, warn};
use pico_args::Arguments;
use private_blackjack::{InMemoryPlayerRepository, PlayerId, TableManager};

use config::BotConfig;

const HELP: &str = "\
Run basic-strategy bots at a blackjack table

USAGE:
  pb_bots [OPTIONS]

OPTIONS:
  --rounds     N           Rounds to play             [default: env BOT_ROUNDS or 100]
  --bots       N           Bots to seat               [default: env BOT_COUNT or 3]
  --seed       N           Shoe seed for a replayable run  [default: env BJ_SHOE_SEED or random]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  BOT_STARTING_BALANCE     Chips each bot starts with
  BOT_BASE_BET             Flat bet per round
  BJ_NUM_DECKS             Decks in the shoe
  BJ_MAX_SEATS             Seats at the table
  BJ_DEALER_HITS_SOFT_17   Dealer draws on soft 17 (true/false)
  BJ_BLACKJACK_PAYOUT_NUM  Natural payout numerator
  BJ_BLACKJACK_PAYOUT_DEN  Natural payout denominator
  RUST_LOG                 Log level (e.g., info, debug)
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let config = BotConfig::from_env(
        pargs.opt_value_from_str("--rounds")?,
        pargs.opt_value_from_str("--bots")?,
        pargs.opt_value_from_str("--seed")?,
    )?;
    config.validate()?;

    // Finish the current round, then stop.
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    set_handler(move || handler_flag.store(false, Ordering::SeqCst))?;

    env_logger::builder().format_target(false).init();
    info!(
        "Seating {} bot(s) for {} round(s), {} chips each, betting {}",
        config.bots, config.rounds, config.starting_balance, config.base_bet
    );

    let table = TableManager::new(
        config.table.clone(),
        Arc::new(InMemoryPlayerRepository::new()),
    );
    let rules = table.config();
    info!(
        "Rules: {} deck(s), dealer {} soft 17, blackjack pays {}",
        rules.num_decks,
        if rules.dealer_hits_soft_17 { "hits" } else { "stands on" },
        rules.blackjack_payout
    );
    let bots: Vec<PlayerId> = (1..=config.bots as PlayerId).collect();
    for (seat, &id) in (1..).zip(&bots) {
        table.create_player(id, &format!("bot-{id}"))?;
        table.add_balance(id, config.starting_balance)?;
        table.seat_player(id, seat)?;
    }

    let mut played = 0;
    while played < config.rounds && running.load(Ordering::SeqCst) {
        let mut betting = 0;
        for &id in &bots {
            match table.place_bet(id, config.base_bet) {
                Ok(_) => betting += 1,
                Err(e) => debug!("bot-{id} sits out: {e}"),
            }
        }
        if betting == 0 {
            warn!("Every bot is broke");
            break;
        }

        table.start_round()?;
        for &id in &bots {
            play_turn(&table, id)?;
        }
        let summary = table.finish_round()?;
        played += 1;

        info!("Round {played}: dealer {}", summary.dealer);
        for result in &summary.results {
            info!(
                "  bot-{} hand {}: {} -> {} (paid {})",
                result.player_id, result.hand_index, result.hand, result.outcome, result.payout
            );
        }
    }

    info!("Played {played} round(s)");
    for player in table.all_players() {
        let net = player.balance() - config.starting_balance;
        info!("  {}: balance {} ({net:+})", player.name, player.balance());
    }

    Ok(())
}

/// Act on each of a bot's live hands until all of them are finished.
fn play_turn(table: &TableManager, id: PlayerId) -> Result<(), Error> {
    let up = table
        .dealer_up_card()
        .ok_or_else(|| anyhow!("dealer has no up card"))?;

    loop {
        let player = table.get_player(id)?;
        let Some(index) = player.hands().iter().position(|hand| !hand.is_terminal()) else {
            return Ok(());
        };
        let hand = &player.hands()[index];
        let available = table.available_actions(id, index)?;
        let action = strategy::decide(hand, up, &available)
            .ok_or_else(|| anyhow!("no action available for bot-{id} hand {index}"))?;

        debug!("bot-{id} hand {index} {hand} vs {up}: {action}");
        table.execute_action(&action.to_string(), id, index)?;
    }
}
