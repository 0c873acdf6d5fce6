// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # coinpool — Shared Coin Pool
//!
//! A small in-memory pool of fungible coins and the accounts that draw from
//! it. The pool hands out at most what it has, and every account hands back
//! everything it holds the moment it goes away — explicitly via
//! [`Account::release`], or implicitly when it falls out of scope.
//!
//! The whole point is the conservation law: at any instant,
//!
//! ```text
//! ledger balance + sum of all live account balances == coins ever funded
//! ```
//!
//! Rust's deterministic destructors make that law enforceable without any
//! caller discipline. There is no "forgot to give the coins back" bug class
//! here; `Drop` runs exactly once, exactly at scope exit.
//!
//! ## Architecture
//!
//! ```text
//! ledger.rs   — the pool: clamped distribution, checked receipt, audit trail
//! account.rs  — per-holder balance with return-on-drop semantics
//! ```
//!
//! ## Design Principles
//!
//! 1. **All amounts are `u64` in smallest units.** No floating point, no
//!    negative amounts — the type system rejects them before we have to.
//!
//! 2. **Over-requests clamp, they don't fail.** Asking for 100 coins from a
//!    pool of 50 yields 50. Callers that care compare granted vs. requested.
//!
//! 3. **Shared access is serialized.** Accounts hold the ledger behind
//!    `Arc<parking_lot::Mutex<_>>`; every mutation takes the lock, so the
//!    conservation law survives concurrent callers unchanged.
//!
//! 4. **Serializable state.** The ledger and its event trail derive
//!    `Serialize`/`Deserialize` so a pool can be snapshotted or inspected
//!    as JSON at any point.

pub mod account;
pub mod ledger;

pub use account::Account;
pub use ledger::{Coins, Ledger, LedgerError, LedgerEvent, SharedLedger};
