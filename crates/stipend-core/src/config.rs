//! Ledger and rewards configuration.

use crate::identifiers::{Address, TokenAddress};
use crate::types::Amount;
use serde::{Deserialize, Serialize};

/// Monthly billing interval offered by clients as a default (30 days).
pub const FREQ_MONTHLY: u64 = 2_592_000;
/// Quarterly billing interval (90 days).
pub const FREQ_QUARTERLY: u64 = 7_776_000;
/// Yearly billing interval (365 days).
pub const FREQ_YEARLY: u64 = 31_536_000;

/// Default claim threshold in reward points.
pub const DEFAULT_CLAIM_THRESHOLD: u64 = 1000;

/// Rewards accrual and payout policy.
///
/// Accrual converts each successful payment into points at
/// `amount / points_unit` (saturating at `u64::MAX`); the default of one
/// point per smallest currency unit keeps the conversion trivial for
/// embedders that bill in whole units. A claim pays
/// `points * reward_unit` of `reward_token` from `treasury`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsConfig {
    /// Minimum points required to claim
    pub claim_threshold: u64,
    /// Currency units per reward point accrued
    pub points_unit: Amount,
    /// Token claims are paid out in
    pub reward_token: TokenAddress,
    /// Wallet claims are paid out from
    pub treasury: Address,
    /// Reward-token units paid per claimed point
    pub reward_unit: Amount,
}

impl RewardsConfig {
    /// Policy with the observed 1000-point threshold, one point per
    /// currency unit, and one reward-token unit per point.
    pub fn new(reward_token: TokenAddress, treasury: Address) -> Self {
        Self {
            claim_threshold: DEFAULT_CLAIM_THRESHOLD,
            points_unit: 1,
            reward_token,
            treasury,
            reward_unit: 1,
        }
    }

    /// Points accrued for a single successful payment of `amount`.
    pub fn points_for(&self, amount: Amount) -> u64 {
        let unit = self.points_unit.max(1);
        u64::try_from(amount / unit).unwrap_or(u64::MAX)
    }

    /// Reward-token payout for claiming `points`.
    pub fn payout_for(&self, points: u64) -> Amount {
        Amount::from(points).saturating_mul(self.reward_unit)
    }
}

/// Top-level ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Account allowed to register services
    pub admin: Address,
    /// Rewards policy
    pub rewards: RewardsConfig,
}

impl LedgerConfig {
    /// Configuration with the default rewards policy.
    pub fn new(admin: Address, reward_token: TokenAddress, treasury: Address) -> Self {
        Self {
            admin,
            rewards: RewardsConfig::new(reward_token, treasury),
        }
    }
}
