//! Authoritative ledger state.
//!
//! The store exclusively owns all services, subscriptions, and reward
//! accounts; the engines read-modify-write through it and never hold
//! independent copies. A single `RwLock` over the state makes every read
//! and conditional write atomic: readers never observe a half-applied
//! mutation. The store emits no notifications; publishing after a
//! successful mutation is the engines' job.

use std::collections::HashMap;
use stipend_core::{Address, LedgerError, RewardAccount, Service, Subscription};
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    services: HashMap<String, Service>,
    subscriptions: HashMap<Address, Vec<Subscription>>,
    rewards: HashMap<Address, RewardAccount>,
}

/// Authoritative mapping from owners to subscription sequences, names to
/// services, and owners to reward balances.
#[derive(Default)]
pub struct LedgerStore {
    state: RwLock<State>,
}

impl LedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a registered service by name.
    pub async fn service(&self, name: &str) -> Option<Service> {
        self.state.read().await.services.get(name).cloned()
    }

    /// All registered services, in no particular order.
    pub async fn services(&self) -> Vec<Service> {
        self.state.read().await.services.values().cloned().collect()
    }

    /// Register a service. Services are immutable once created, so a
    /// duplicate name is rejected rather than overwritten.
    pub async fn insert_service(&self, service: Service) -> Result<(), LedgerError> {
        let mut state = self.state.write().await;
        if state.services.contains_key(&service.name) {
            return Err(LedgerError::ServiceAlreadyRegistered {
                name: service.name,
            });
        }
        state.services.insert(service.name.clone(), service);
        Ok(())
    }

    /// The owner's ordered subscription sequence.
    pub async fn subscriptions(&self, owner: Address) -> Vec<Subscription> {
        self.state
            .read()
            .await
            .subscriptions
            .get(&owner)
            .cloned()
            .unwrap_or_default()
    }

    /// One subscription by `(owner, index)`.
    pub async fn subscription(
        &self,
        owner: Address,
        index: usize,
    ) -> Result<Subscription, LedgerError> {
        self.state
            .read()
            .await
            .subscriptions
            .get(&owner)
            .and_then(|subs| subs.get(index))
            .cloned()
            .ok_or(LedgerError::SubscriptionNotFound { owner, index })
    }

    /// Append a subscription to its owner's sequence, returning its index.
    pub async fn push_subscription(&self, subscription: Subscription) -> usize {
        let mut state = self.state.write().await;
        let subs = state.subscriptions.entry(subscription.owner).or_default();
        subs.push(subscription);
        subs.len() - 1
    }

    /// Conditionally mutate one subscription under the write lock.
    ///
    /// The closure must not mutate before its last fallible check: an
    /// `Err` return is expected to leave the subscription untouched.
    pub async fn with_subscription_mut<R>(
        &self,
        owner: Address,
        index: usize,
        f: impl FnOnce(&mut Subscription) -> Result<R, LedgerError>,
    ) -> Result<R, LedgerError> {
        let mut state = self.state.write().await;
        let sub = state
            .subscriptions
            .get_mut(&owner)
            .and_then(|subs| subs.get_mut(index))
            .ok_or(LedgerError::SubscriptionNotFound { owner, index })?;
        f(sub)
    }

    /// Unclaimed reward points for an owner (zero if no account yet).
    pub async fn reward_points(&self, owner: Address) -> u64 {
        self.state
            .read()
            .await
            .rewards
            .get(&owner)
            .map(|acct| acct.points)
            .unwrap_or(0)
    }

    /// Credit reward points, creating the account on first accrual.
    /// Returns the new balance.
    pub async fn add_points(&self, owner: Address, points: u64) -> u64 {
        let mut state = self.state.write().await;
        let acct = state
            .rewards
            .entry(owner)
            .or_insert_with(|| RewardAccount::new(owner));
        acct.points = acct.points.saturating_add(points);
        acct.points
    }

    /// Zero an owner's reward balance, returning what was held.
    pub async fn reset_points(&self, owner: Address) -> u64 {
        let mut state = self.state.write().await;
        match state.rewards.get_mut(&owner) {
            Some(acct) => std::mem::take(&mut acct.points),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stipend_core::TokenAddress;

    fn owner() -> Address {
        Address::from_bytes([7u8; 20])
    }

    fn sample(owner: Address) -> Subscription {
        Subscription {
            owner,
            service_name: "Acme".to_string(),
            amount: 100,
            payment_token: TokenAddress::NATIVE,
            frequency_secs: 60,
            last_payment: 0,
            next_payment: 60,
            active: true,
        }
    }

    #[tokio::test]
    async fn duplicate_service_is_rejected() {
        let store = LedgerStore::new();
        let wallet = Address::from_bytes([2u8; 20]);
        store.insert_service(Service::new("Acme", wallet)).await.unwrap();
        let err = store
            .insert_service(Service::new("Acme", Address::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ServiceAlreadyRegistered { .. }));
        // The original registration survives.
        assert_eq!(store.service("Acme").await.unwrap().payout_wallet, wallet);
    }

    #[tokio::test]
    async fn indices_are_assigned_in_append_order() {
        let store = LedgerStore::new();
        assert_eq!(store.push_subscription(sample(owner())).await, 0);
        assert_eq!(store.push_subscription(sample(owner())).await, 1);
        assert_eq!(store.subscriptions(owner()).await.len(), 2);
    }

    #[tokio::test]
    async fn missing_index_reports_not_found() {
        let store = LedgerStore::new();
        let err = store.subscription(owner(), 0).await.unwrap_err();
        assert!(matches!(err, LedgerError::SubscriptionNotFound { index: 0, .. }));
    }

    #[tokio::test]
    async fn failed_conditional_write_leaves_state_intact() {
        let store = LedgerStore::new();
        store.push_subscription(sample(owner())).await;
        let err = store
            .with_subscription_mut(owner(), 0, |sub| {
                if sub.active {
                    return Err(LedgerError::InvalidAmount);
                }
                sub.active = true;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount));
        assert!(store.subscription(owner(), 0).await.unwrap().active);
    }

    #[tokio::test]
    async fn points_accumulate_and_reset() {
        let store = LedgerStore::new();
        assert_eq!(store.reward_points(owner()).await, 0);
        assert_eq!(store.add_points(owner(), 600).await, 600);
        assert_eq!(store.add_points(owner(), 500).await, 1100);
        assert_eq!(store.reset_points(owner()).await, 1100);
        assert_eq!(store.reward_points(owner()).await, 0);
    }
}
