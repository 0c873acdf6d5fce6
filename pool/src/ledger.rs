//! # Ledger — The Shared Coin Pool
//!
//! A [`Ledger`] tracks a single pool of fungible coins. Coins leave through
//! [`Ledger::distribute`] and come back through [`Ledger::receive`]; nothing
//! else touches the balance. Distribution clamps to the available balance
//! rather than failing — a request for more than the pool holds is granted
//! partially, and the caller learns how much it actually got from the return
//! value.
//!
//! Alongside the balance the ledger keeps `outstanding`, the number of coins
//! currently circulating outside the pool. While coins only move through the
//! two operations above, `balance + outstanding` is constant — that is the
//! conservation law the rest of the crate is built around, and the tests
//! pin it down.
//!
//! Every mutation appends a [`LedgerEvent`] to an audit trail, so a pool's
//! full history can be replayed or serialized for inspection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coin amount in smallest units. Negative amounts are unrepresentable.
pub type Coins = u64;

/// A ledger shared between accounts.
///
/// Accounts keep one of these so that their drop path can return coins.
/// All mutations go through the mutex; see the crate-level notes on
/// serialized access.
pub type SharedLedger = Arc<Mutex<Ledger>>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Arithmetic overflow while receiving coins.
    ///
    /// Cannot happen while coins only circulate between the pool and its
    /// accounts — a returned amount always fits back into the balance it
    /// came out of. Direct `receive` calls that mint fresh coins can hit it.
    #[error("ledger overflow: balance {balance}, received {amount}")]
    Overflow {
        /// The balance before the failed receipt.
        balance: Coins,
        /// The amount that caused the overflow.
        amount: Coins,
    },
}

// ---------------------------------------------------------------------------
// LedgerEvent
// ---------------------------------------------------------------------------

/// One entry in the ledger's append-only audit trail.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// The pool was opened with an initial balance.
    Funded {
        /// Coins the pool started with.
        amount: Coins,
        /// When the pool was opened (UTC).
        at: DateTime<Utc>,
    },

    /// Coins left the pool. `granted < requested` means the request
    /// was clamped to the available balance.
    Distributed {
        /// The amount that was asked for.
        requested: Coins,
        /// The amount that was actually handed out.
        granted: Coins,
        /// When the distribution happened (UTC).
        at: DateTime<Utc>,
    },

    /// Coins came back into the pool.
    Received {
        /// The amount handed back.
        amount: Coins,
        /// When the receipt happened (UTC).
        at: DateTime<Utc>,
    },
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// The shared coin pool.
///
/// Single source of truth for how many coins are available. Not a registry,
/// not a database — one balance, two operations, one invariant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ledger {
    /// Coins currently available for distribution.
    balance: Coins,

    /// Coins distributed and not yet returned.
    ///
    /// `balance + outstanding` stays constant across any distribute/receive
    /// sequence in which coins only circulate (no fresh minting).
    outstanding: Coins,

    /// Append-only history of every balance-changing operation.
    events: Vec<LedgerEvent>,
}

impl Ledger {
    /// Opens a pool with `initial` coins and records the funding event.
    pub fn new(initial: Coins) -> Self {
        tracing::debug!(initial, "ledger opened");
        Self {
            balance: initial,
            outstanding: 0,
            events: vec![LedgerEvent::Funded {
                amount: initial,
                at: Utc::now(),
            }],
        }
    }

    /// Returns the coins currently available for distribution.
    pub fn balance(&self) -> Coins {
        self.balance
    }

    /// Returns the coins currently circulating outside the pool.
    pub fn outstanding(&self) -> Coins {
        self.outstanding
    }

    /// Returns the full audit trail, oldest entry first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Hands out up to `requested` coins and returns the granted amount.
    ///
    /// The grant is `min(requested, balance)` — an over-request is clamped
    /// silently rather than rejected, so this never fails. A request of 0
    /// grants 0 and is still recorded.
    pub fn distribute(&mut self, requested: Coins) -> Coins {
        let granted = requested.min(self.balance);
        self.balance -= granted;
        self.outstanding += granted;
        self.events.push(LedgerEvent::Distributed {
            requested,
            granted,
            at: Utc::now(),
        });

        if granted < requested {
            tracing::warn!(
                requested,
                granted,
                balance = self.balance,
                "distribution clamped to available balance"
            );
        } else {
            tracing::debug!(requested, balance = self.balance, "coins distributed");
        }

        granted
    }

    /// Takes `amount` coins back into the pool and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if the receipt would push the
    /// balance past `u64::MAX`, leaving the ledger unchanged.
    pub fn receive(&mut self, amount: Coins) -> Result<Coins, LedgerError> {
        let new_balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                balance: self.balance,
                amount,
            })?;

        self.balance = new_balance;
        // Receiving more than is outstanding means fresh coins entered the
        // system; outstanding floors at zero rather than wrapping.
        self.outstanding = self.outstanding.saturating_sub(amount);
        self.events.push(LedgerEvent::Received {
            amount,
            at: Utc::now(),
        });
        tracing::debug!(amount, balance = self.balance, "coins received");

        Ok(new_balance)
    }

    /// Wraps the ledger for sharing with accounts.
    pub fn into_shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
