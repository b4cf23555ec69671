//! Stipend Ledger - Recurring-Subscription Payment Ledger
//!
//! Authoritative state and engines for recurring payment subscriptions:
//! end users subscribe to registered services, due payments are charged
//! against a funds handler, and loyalty reward points accrue on every
//! successful charge and can be claimed above a threshold.
//!
//! # Architecture
//!
//! - [`LedgerStore`]: the authoritative maps (services, per-owner
//!   subscription sequences, reward balances) behind atomic reads and
//!   conditional writes
//! - [`SubscriptionEngine`]: create / cancel / process-payment rules,
//!   including the drift-free payment schedule
//! - [`RewardsEngine`]: point accrual and threshold-gated claims
//! - [`NotificationBus`]: commit-order event fan-out with explicit
//!   subscribe/detach handles
//! - [`Ledger`]: the external facade; serializes mutations per owner so
//!   concurrent callers observe one fully-committed operation at a time
//!
//! Funds movement and time are effect interfaces (`TokenTransfer`,
//! `Clock` in `stipend-core`); [`InMemoryBank`] is the built-in funds
//! handler.

#![forbid(unsafe_code)]

/// Authoritative state maps
pub mod store;

/// In-memory funds handler
pub mod bank;

/// Event fan-out with subscription handles
pub mod bus;

/// Subscription lifecycle and payment rules
pub mod subscription;

/// Reward accrual and claims
pub mod rewards;

/// External facade with per-owner serialization
pub mod ledger;

pub use bank::InMemoryBank;
pub use bus::{EventSubscription, NotificationBus};
pub use ledger::Ledger;
pub use rewards::RewardsEngine;
pub use store::LedgerStore;
pub use subscription::SubscriptionEngine;
