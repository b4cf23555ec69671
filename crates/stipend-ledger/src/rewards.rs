//! Reward accrual and claims.
//!
//! Accrual policy: each successful payment credits
//! `amount / points_unit` points (default one point per smallest
//! currency unit). Claim policy: a claim takes the full balance, points
//! reset to zero, and pays `points * reward_unit` of the configured
//! reward token from the treasury wallet. Both rates are configuration,
//! not code.

use crate::store::LedgerStore;
use std::sync::Arc;
use stipend_core::{Address, Amount, LedgerError, RewardsConfig, TokenTransfer};
use tracing::{debug, info};

/// Accrues points on payments and settles claims.
pub struct RewardsEngine {
    store: Arc<LedgerStore>,
    transfer: Arc<dyn TokenTransfer>,
    config: RewardsConfig,
}

impl RewardsEngine {
    /// Wire the engine to the store and the payout rail.
    pub fn new(
        store: Arc<LedgerStore>,
        transfer: Arc<dyn TokenTransfer>,
        config: RewardsConfig,
    ) -> Self {
        Self {
            store,
            transfer,
            config,
        }
    }

    /// The active rewards policy.
    pub fn config(&self) -> &RewardsConfig {
        &self.config
    }

    /// Credit points for a successful payment of `amount`.
    ///
    /// Called by the subscription engine after the funds transfer
    /// commits. Returns the points credited.
    pub async fn accrue(&self, owner: Address, amount: Amount) -> u64 {
        let points = self.config.points_for(amount);
        if points == 0 {
            return 0;
        }
        let balance = self.store.add_points(owner, points).await;
        debug!(%owner, points, balance, "reward points accrued");
        points
    }

    /// Claim the owner's full point balance.
    ///
    /// Requires `points >= claim_threshold`. Pays out through the
    /// transfer effect first and only then zeroes the balance, so a
    /// failed payout leaves the points intact. Returns the points
    /// claimed.
    pub async fn claim_rewards(&self, owner: Address) -> Result<u64, LedgerError> {
        let points = self.store.reward_points(owner).await;
        if points < self.config.claim_threshold {
            return Err(LedgerError::InsufficientPoints {
                points,
                threshold: self.config.claim_threshold,
            });
        }

        let payout = self.config.payout_for(points);
        self.transfer
            .transfer(self.config.reward_token, self.config.treasury, owner, payout)
            .await?;
        self.store.reset_points(owner).await;

        info!(%owner, points, payout, "rewards claimed");
        Ok(points)
    }
}
