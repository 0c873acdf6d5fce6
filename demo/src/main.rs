// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # coinpool Walkthrough
//!
//! Entry point for the `coinpool-demo` binary. Initializes structured
//! logging, then walks the canonical pool scenarios top to bottom:
//!
//! - a player joins, draws coins, and leaves (scope exit returns the purse)
//! - a short pool clamps an over-request
//! - an explicit release settles a purse mid-scope
//!
//! Log verbosity follows `RUST_LOG`; the printed narration is illustrative,
//! not an interface.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coinpool::{Account, Ledger};

/// Coins the bank opens with. Matches the classic walkthrough numbers.
const OPENING_BALANCE: u64 = 10_000;

fn main() -> Result<()> {
    init_logging("coinpool=debug,coinpool_demo=info");

    // One pool, shared by every account below.
    let bank = Ledger::new(OPENING_BALANCE).into_shared();

    // --- Scope exit returns the purse ---
    {
        let player_one = Account::open(100, Arc::clone(&bank));
        println!(
            "A new player has joined the game with {} coins",
            player_one.held()
        );
        println!(
            "There are now {} coins left in the bank",
            bank.lock().balance()
        );
    }
    // `player_one` is gone; its purse came back on drop.
    println!("PlayerOne has left the game");
    println!("The bank now has {} coins", bank.lock().balance());

    // --- Clamping: the pool never over-promises ---
    let mut player_two = Account::open(2_000, Arc::clone(&bank));
    let winnings = player_two.acquire(9_000);
    println!(
        "PlayerTwo asked for 9000 more and won {} (the bank had no more to give)",
        winnings
    );

    // --- Explicit settlement ---
    let returned = player_two.release();
    println!("PlayerTwo cashed out {} coins", returned);
    println!("The bank is back to {} coins", bank.lock().balance());

    let snapshot = serde_json::to_string_pretty(&*bank.lock())?;
    tracing::debug!(%snapshot, "final ledger state");

    Ok(())
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides `default_level` when set, using the usual
/// `EnvFilter` directive syntax.
fn init_logging(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}
