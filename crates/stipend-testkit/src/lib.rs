//! Stipend Testkit - Deterministic Test Tooling
//!
//! A controllable clock plus fixtures for exercising the ledger without
//! wall-clock time or external funds rails. Production code must not
//! depend on this crate.

#![forbid(unsafe_code)]

/// Controllable time source
pub mod time;

/// Ledger fixtures and builders
pub mod fixtures;

pub use fixtures::{test_address, test_token, LedgerFixture};
pub use time::ManualClock;
