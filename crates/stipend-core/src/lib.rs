//! Stipend Core - Subscription Ledger Foundation
//!
//! This crate provides the domain types and effect interfaces shared by the
//! stipend ledger. It contains no ledger logic: the authoritative store, the
//! subscription and rewards engines, and the notification bus live in
//! `stipend-ledger`, and deterministic test tooling lives in
//! `stipend-testkit`.
//!
//! # Contents
//!
//! - Identifiers: [`Address`] and [`TokenAddress`] account/token keys
//! - Domain types: [`Service`], [`Subscription`], [`RewardAccount`]
//! - Error taxonomy: [`LedgerError`] partitioned by [`ErrorKind`]
//! - Events: [`LedgerEvent`] state-transition notifications
//! - Configuration: [`LedgerConfig`] and [`RewardsConfig`]
//! - Time: the [`Clock`] effect interface and the production [`SystemClock`]
//! - Funds movement: the [`TokenTransfer`] effect interface

#![forbid(unsafe_code)]

/// Account and token identifiers
pub mod identifiers;

/// Services, subscriptions, and reward accounts
pub mod types;

/// Unified error handling
pub mod errors;

/// Ledger state-transition events
pub mod events;

/// Ledger and rewards configuration
pub mod config;

/// Clock effect interface for deterministic time
pub mod time;

/// Funds-movement effect interface
pub mod transfer;

pub use config::{
    LedgerConfig, RewardsConfig, DEFAULT_CLAIM_THRESHOLD, FREQ_MONTHLY, FREQ_QUARTERLY,
    FREQ_YEARLY,
};
pub use errors::{ErrorKind, LedgerError};
pub use events::LedgerEvent;
pub use identifiers::{Address, TokenAddress};
pub use time::{Clock, SystemClock};
pub use transfer::{TokenTransfer, TransferError};
pub use types::{Amount, RewardAccount, Service, Subscription};
