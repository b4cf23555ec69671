//! Subscription lifecycle and payment processing.
//!
//! The engine validates commands, applies them to the store, and
//! publishes an event once the mutation has committed. It performs no
//! serialization of its own: callers (the [`crate::Ledger`] facade) must
//! hold the owner's lock across each call so same-owner operations apply
//! one at a time.

use crate::bus::NotificationBus;
use crate::rewards::RewardsEngine;
use crate::store::LedgerStore;
use std::sync::Arc;
use stipend_core::{
    Address, Amount, Clock, LedgerError, LedgerEvent, Subscription, TokenAddress, TokenTransfer,
};
use tracing::info;

/// Applies create / cancel / process-payment commands.
pub struct SubscriptionEngine {
    store: Arc<LedgerStore>,
    bus: Arc<NotificationBus>,
    rewards: Arc<RewardsEngine>,
    transfer: Arc<dyn TokenTransfer>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionEngine {
    /// Wire the engine to its collaborators.
    pub fn new(
        store: Arc<LedgerStore>,
        bus: Arc<NotificationBus>,
        rewards: Arc<RewardsEngine>,
        transfer: Arc<dyn TokenTransfer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            bus,
            rewards,
            transfer,
            clock,
        }
    }

    /// Append a new active subscription to the owner's sequence.
    ///
    /// The first payment becomes due one full cycle after creation:
    /// `last_payment = now`, `next_payment = now + frequency_secs`.
    /// Returns the new subscription's index.
    pub async fn create_subscription(
        &self,
        owner: Address,
        service_name: &str,
        amount: Amount,
        frequency_secs: u64,
        payment_token: TokenAddress,
    ) -> Result<usize, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if frequency_secs == 0 {
            return Err(LedgerError::InvalidFrequency);
        }
        if self.store.service(service_name).await.is_none() {
            return Err(LedgerError::UnknownService {
                name: service_name.to_string(),
            });
        }

        let now = self.clock.unix_now().await;
        let index = self
            .store
            .push_subscription(Subscription {
                owner,
                service_name: service_name.to_string(),
                amount,
                payment_token,
                frequency_secs,
                last_payment: now,
                next_payment: now.saturating_add(frequency_secs),
                active: true,
            })
            .await;

        info!(%owner, service = service_name, amount, frequency_secs, index, "subscription created");
        self.bus.publish(&LedgerEvent::SubscriptionCreated {
            owner,
            service_name: service_name.to_string(),
            amount,
        });
        Ok(index)
    }

    /// Cancel the subscription at `index`. Terminal: there is no
    /// reactivation, and no further payment will ever process against it.
    /// Cancelling twice is an explicit error, not a silent no-op.
    pub async fn cancel_subscription(
        &self,
        owner: Address,
        index: usize,
    ) -> Result<(), LedgerError> {
        self.store
            .with_subscription_mut(owner, index, |sub| {
                if !sub.active {
                    return Err(LedgerError::AlreadyInactive { owner, index });
                }
                sub.active = false;
                Ok(())
            })
            .await?;
        info!(%owner, index, "subscription cancelled");
        Ok(())
    }

    /// Charge a due payment and advance the schedule by one cycle.
    ///
    /// The new window is anchored to the old `next_payment`, never to the
    /// processing time, so a late caller does not drift the schedule.
    /// Skipped cycles are not retroactively charged: one call charges one
    /// cycle regardless of how far past due the subscription is.
    ///
    /// On a transfer failure the timestamps stay untouched and no points
    /// accrue.
    pub async fn process_payment(&self, owner: Address, index: usize) -> Result<(), LedgerError> {
        let sub = self.store.subscription(owner, index).await?;
        if !sub.active {
            return Err(LedgerError::InactiveSubscription { owner, index });
        }
        let now = self.clock.unix_now().await;
        if now < sub.next_payment {
            return Err(LedgerError::TooEarly {
                now,
                next_payment: sub.next_payment,
            });
        }
        let service = self.store.service(&sub.service_name).await.ok_or_else(|| {
            LedgerError::UnknownService {
                name: sub.service_name.clone(),
            }
        })?;

        self.transfer
            .transfer(sub.payment_token, owner, service.payout_wallet, sub.amount)
            .await?;

        self.store
            .with_subscription_mut(owner, index, |s| {
                s.advance_schedule();
                Ok(())
            })
            .await?;
        let points = self.rewards.accrue(owner, sub.amount).await;

        info!(%owner, index, service = %sub.service_name, amount = sub.amount, points, "payment processed");
        self.bus.publish(&LedgerEvent::PaymentProcessed {
            owner,
            service_name: sub.service_name,
            amount: sub.amount,
        });
        Ok(())
    }
}
