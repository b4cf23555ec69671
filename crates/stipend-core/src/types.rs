//! Domain types for the subscription ledger.

use crate::identifiers::{Address, TokenAddress};
use serde::{Deserialize, Serialize};

/// Currency amount in the smallest indivisible unit.
///
/// 18-decimal token amounts overflow `u64` above ~18 whole tokens, so
/// amounts are 128-bit throughout. Converting to and from human-readable
/// decimal form is the presentation layer's job.
pub type Amount = u128;

/// A registered service that subscriptions can pay into.
///
/// Created by the admin-only register operation and immutable afterwards;
/// there is no deregistration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique service name, the lookup key for subscriptions
    pub name: String,
    /// Wallet that receives subscription payments
    pub payout_wallet: Address,
    /// Always true for stored services; retained for wire compatibility
    /// with clients that branch on it
    pub registered: bool,
}

impl Service {
    /// Create a registered service.
    pub fn new(name: impl Into<String>, payout_wallet: Address) -> Self {
        Self {
            name: name.into(),
            payout_wallet,
            registered: true,
        }
    }
}

/// A recurring payment obligation from an owner to a service.
///
/// Identified by `(owner, index)` into the owner's ordered sequence.
/// Cancellation flips `active` to false and never removes the entry, so an
/// index held by a concurrent caller stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Account that owns and funds the subscription
    pub owner: Address,
    /// Name of the registered service being paid
    pub service_name: String,
    /// Amount charged per cycle, in smallest currency units
    pub amount: Amount,
    /// Token the payment is denominated in
    pub payment_token: TokenAddress,
    /// Seconds between successive payments
    pub frequency_secs: u64,
    /// Unix timestamp of the last charge (creation time before any charge)
    pub last_payment: u64,
    /// Unix timestamp at which the next charge becomes due
    pub next_payment: u64,
    /// False once cancelled; cancellation is terminal
    pub active: bool,
}

impl Subscription {
    /// True when a payment may be processed at `now`.
    pub fn is_due(&self, now: u64) -> bool {
        self.active && now >= self.next_payment
    }

    /// Advance the schedule by exactly one cycle.
    ///
    /// The new window is anchored to the previous `next_payment`, not to
    /// the processing time, so late payments do not drift the schedule
    /// toward the caller's clock.
    pub fn advance_schedule(&mut self) {
        self.last_payment = self.next_payment;
        self.next_payment = self.next_payment.saturating_add(self.frequency_secs);
    }
}

/// Loyalty point balance for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAccount {
    /// Account the points belong to
    pub owner: Address,
    /// Accrued, unclaimed points
    pub points: u64,
}

impl RewardAccount {
    /// Create an empty account.
    pub fn new(owner: Address) -> Self {
        Self { owner, points: 0 }
    }
}
