//! # Account — A Purse Drawn from the Pool
//!
//! An [`Account`] holds coins taken out of a shared [`Ledger`](crate::Ledger)
//! and owes every one of them back. The debt is settled in exactly one of
//! two ways:
//!
//! 1. **Explicitly** — [`Account::release`] consumes the account and returns
//!    the held balance to the ledger, telling the caller how much went back.
//!
//! 2. **Implicitly** — the `Drop` impl returns the held balance when the
//!    account goes out of scope. This is the deterministic-cleanup guarantee:
//!    no garbage collector gets a say in when the coins come home.
//!
//! Both paths funnel through the same idempotent helper, so an explicitly
//! released account does not return its coins a second time on drop.
//!
//! Requests are clamped by the ledger: opening an account with a request of
//! 100 against a pool of 50 yields an account holding 50. Check
//! [`Account::held`] when the distinction matters.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ledger::{Coins, SharedLedger};

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A holder of coins drawn from a shared ledger.
///
/// Not `Clone` — each account is the sole owner of its held balance, which
/// is what makes the return-on-drop accounting sound. The ledger handle
/// inside is shared; the coins are not.
#[derive(Debug)]
pub struct Account {
    /// Random identifier, for log correlation only.
    id: Uuid,

    /// Coins currently held. Returned to the ledger in full on release.
    held: Coins,

    /// When this account was opened (UTC).
    opened_at: DateTime<Utc>,

    /// Handle to the pool the coins came from and go back to.
    ledger: SharedLedger,
}

impl Account {
    /// Opens an account by drawing `requested` coins from `ledger`.
    ///
    /// The account may hold less than requested if the pool was short;
    /// the grant is whatever [`Ledger::distribute`](crate::Ledger::distribute)
    /// clamped it to.
    pub fn open(requested: Coins, ledger: SharedLedger) -> Self {
        let held = ledger.lock().distribute(requested);
        let account = Self {
            id: Uuid::new_v4(),
            held,
            opened_at: Utc::now(),
            ledger,
        };
        tracing::debug!(account = %account.id, requested, held, "account opened");
        account
    }

    /// Returns this account's identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the coins currently held.
    pub fn held(&self) -> Coins {
        self.held
    }

    /// Returns when this account was opened.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Draws `requested` more coins from the ledger into this account.
    ///
    /// Returns the granted amount, which may be less than requested if the
    /// pool was short. The grant is added to [`held`](Self::held).
    pub fn acquire(&mut self, requested: Coins) -> Coins {
        let granted = self.ledger.lock().distribute(requested);
        self.held += granted;
        tracing::debug!(
            account = %self.id,
            requested,
            granted,
            held = self.held,
            "coins acquired"
        );
        granted
    }

    /// Returns the entire held balance to the ledger and consumes the account.
    ///
    /// Returns the amount handed back. Dropping the account does the same
    /// thing; this method exists for callers that want the returned amount
    /// or an explicit settlement point.
    pub fn release(mut self) -> Coins {
        let returned = self.held;
        self.return_held();
        returned
    }

    /// Idempotent return path shared by [`release`](Self::release) and `Drop`.
    ///
    /// Zeroes `held` before touching the ledger, so the drop that follows an
    /// explicit release finds nothing left to return.
    fn return_held(&mut self) {
        if self.held == 0 {
            return;
        }
        let amount = std::mem::take(&mut self.held);
        match self.ledger.lock().receive(amount) {
            Ok(balance) => {
                tracing::debug!(account = %self.id, amount, balance, "held coins returned");
            }
            Err(err) => {
                // Unreachable while coins only circulate through this pool:
                // the held amount came out of the balance it is going back
                // into. Logged rather than panicked because this runs on the
                // drop path.
                tracing::error!(account = %self.id, amount, %err, "failed to return held coins");
            }
        }
    }
}

impl Drop for Account {
    fn drop(&mut self) {
        self.return_held();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;

    #[test]
    fn open_draws_from_ledger() {
        let ledger = Ledger::new(10_000).into_shared();
        let account = Account::open(100, ledger.clone());

        assert_eq!(account.held(), 100);
        assert_eq!(ledger.lock().balance(), 9_900);
    }

    #[test]
    fn open_clamped_when_pool_is_short() {
        let ledger = Ledger::new(50).into_shared();
        let account = Account::open(100, ledger.clone());

        assert_eq!(account.held(), 50);
        assert_eq!(ledger.lock().balance(), 0);
    }

    #[test]
    fn acquire_adds_to_held_balance() {
        let ledger = Ledger::new(10_000).into_shared();
        let mut account = Account::open(100, ledger.clone());

        let granted = account.acquire(2_000);
        assert_eq!(granted, 2_000);
        assert_eq!(account.held(), 2_100);
        assert_eq!(ledger.lock().balance(), 7_900);
    }

    #[test]
    fn acquire_clamps_to_remaining_pool() {
        let ledger = Ledger::new(1_000).into_shared();
        let mut account = Account::open(800, ledger.clone());

        let granted = account.acquire(500);
        assert_eq!(granted, 200);
        assert_eq!(account.held(), 1_000);
        assert_eq!(ledger.lock().balance(), 0);
    }

    #[test]
    fn drop_returns_coins_to_ledger() {
        let ledger = Ledger::new(10_000).into_shared();
        {
            let account = Account::open(100, ledger.clone());
            assert_eq!(account.held(), 100);
            assert_eq!(ledger.lock().balance(), 9_900);
        }
        assert_eq!(ledger.lock().balance(), 10_000);
        assert_eq!(ledger.lock().outstanding(), 0);
    }

    #[test]
    fn explicit_release_returns_held_amount() {
        let ledger = Ledger::new(10_000).into_shared();
        let mut account = Account::open(100, ledger.clone());
        account.acquire(400);

        let returned = account.release();
        assert_eq!(returned, 500);
        assert_eq!(ledger.lock().balance(), 10_000);
    }

    #[test]
    fn release_after_clamped_open_returns_only_held() {
        let ledger = Ledger::new(50).into_shared();
        let account = Account::open(100, ledger.clone());

        let returned = account.release();
        assert_eq!(returned, 50);
        assert_eq!(ledger.lock().balance(), 50);
    }

    #[test]
    fn release_does_not_double_return_on_drop() {
        let ledger = Ledger::new(1_000).into_shared();
        let account = Account::open(600, ledger.clone());

        account.release();
        // `release` consumed the account; its drop already ran with held == 0.
        assert_eq!(ledger.lock().balance(), 1_000);
        assert_eq!(ledger.lock().outstanding(), 0);

        // Exactly one receipt in the trail despite release + drop.
        let receipts = ledger
            .lock()
            .events()
            .iter()
            .filter(|e| matches!(e, crate::LedgerEvent::Received { .. }))
            .count();
        assert_eq!(receipts, 1);
    }

    #[test]
    fn empty_account_drop_records_no_receipt() {
        let ledger = Ledger::new(0).into_shared();
        {
            let account = Account::open(100, ledger.clone());
            assert_eq!(account.held(), 0);
        }
        assert!(!ledger
            .lock()
            .events()
            .iter()
            .any(|e| matches!(e, crate::LedgerEvent::Received { .. })));
    }

    #[test]
    fn conservation_across_many_accounts() {
        let ledger = Ledger::new(10_000).into_shared();

        let accounts: Vec<Account> = (1..=8)
            .map(|i| Account::open(i * 300, ledger.clone()))
            .collect();

        let held: Coins = accounts.iter().map(Account::held).sum();
        assert_eq!(ledger.lock().balance() + held, 10_000);

        // Release half explicitly, drop the rest.
        for (i, account) in accounts.into_iter().enumerate() {
            if i % 2 == 0 {
                account.release();
            }
        }
        assert_eq!(ledger.lock().balance(), 10_000);
        assert_eq!(ledger.lock().outstanding(), 0);
    }

    #[test]
    fn accounts_have_distinct_ids() {
        let ledger = Ledger::new(100).into_shared();
        let a = Account::open(10, ledger.clone());
        let b = Account::open(10, ledger.clone());
        assert_ne!(a.id(), b.id());
    }
}
