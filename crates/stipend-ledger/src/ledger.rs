//! External ledger facade.
//!
//! The facade serializes mutations per owner: every mutating call for one
//! owner runs under that owner's async mutex and fully commits (store
//! write plus event publish) before the next begins. Calls for different
//! owners proceed in parallel. All operations are
//! synchronous-to-completion; there is no speculative state, no
//! cancellation of an in-flight operation, and no automatic retry (a
//! resubmitted payment could double-charge if the first attempt
//! committed).

use crate::bank::InMemoryBank;
use crate::bus::{EventSubscription, NotificationBus};
use crate::rewards::RewardsEngine;
use crate::store::LedgerStore;
use crate::subscription::SubscriptionEngine;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use stipend_core::{
    Address, Amount, Clock, LedgerConfig, LedgerError, Service, Subscription, SystemClock,
    TokenAddress, TokenTransfer,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// The ledger's external boundary: commands, reads, and the event stream.
pub struct Ledger {
    config: LedgerConfig,
    store: Arc<LedgerStore>,
    bus: Arc<NotificationBus>,
    subscriptions: SubscriptionEngine,
    rewards: Arc<RewardsEngine>,
    owner_locks: StdMutex<HashMap<Address, Arc<Mutex<()>>>>,
    admin_lock: Mutex<()>,
}

impl Ledger {
    /// Assemble a ledger over the given funds handler and clock.
    pub fn new(
        config: LedgerConfig,
        transfer: Arc<dyn TokenTransfer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = Arc::new(LedgerStore::new());
        let bus = Arc::new(NotificationBus::new());
        let rewards = Arc::new(RewardsEngine::new(
            store.clone(),
            transfer.clone(),
            config.rewards.clone(),
        ));
        let subscriptions = SubscriptionEngine::new(
            store.clone(),
            bus.clone(),
            rewards.clone(),
            transfer,
            clock,
        );
        Self {
            config,
            store,
            bus,
            subscriptions,
            rewards,
            owner_locks: StdMutex::new(HashMap::new()),
            admin_lock: Mutex::new(()),
        }
    }

    /// Assemble a self-contained ledger: in-memory bank, system clock.
    /// Returns the bank so the embedder can seed balances.
    pub fn in_memory(config: LedgerConfig) -> (Self, Arc<InMemoryBank>) {
        let bank = Arc::new(InMemoryBank::new());
        let ledger = Self::new(config, bank.clone(), Arc::new(SystemClock::new()));
        (ledger, bank)
    }

    /// The configuration the ledger was assembled with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn owner_lock(&self, owner: Address) -> Arc<Mutex<()>> {
        #[allow(clippy::unwrap_used)] // lock poisoning requires a prior panic
        let mut locks = self.owner_locks.lock().unwrap();
        locks.entry(owner).or_default().clone()
    }

    /// Register a service. Admin-only; services are immutable once
    /// created and cannot be deregistered.
    pub async fn register_service(
        &self,
        caller: Address,
        name: &str,
        payout_wallet: Address,
    ) -> Result<(), LedgerError> {
        if caller != self.config.admin {
            return Err(LedgerError::NotAdmin { caller });
        }
        let _guard = self.admin_lock.lock().await;
        self.store.insert_service(Service::new(name, payout_wallet)).await?;
        info!(service = name, wallet = %payout_wallet, "service registered");
        Ok(())
    }

    /// Create a subscription for `owner`. Returns its index in the
    /// owner's sequence.
    pub async fn create_subscription(
        &self,
        owner: Address,
        service_name: &str,
        amount: Amount,
        frequency_secs: u64,
        payment_token: TokenAddress,
    ) -> Result<usize, LedgerError> {
        let lock = self.owner_lock(owner);
        let _guard = lock.lock().await;
        self.subscriptions
            .create_subscription(owner, service_name, amount, frequency_secs, payment_token)
            .await
    }

    /// Cancel the subscription at `index`. Terminal.
    pub async fn cancel_subscription(
        &self,
        owner: Address,
        index: usize,
    ) -> Result<(), LedgerError> {
        let lock = self.owner_lock(owner);
        let _guard = lock.lock().await;
        self.subscriptions.cancel_subscription(owner, index).await
    }

    /// Charge a due payment on the subscription at `index`.
    pub async fn process_payment(&self, owner: Address, index: usize) -> Result<(), LedgerError> {
        let lock = self.owner_lock(owner);
        let _guard = lock.lock().await;
        self.subscriptions.process_payment(owner, index).await
    }

    /// Claim the owner's full reward balance. Returns the points claimed.
    pub async fn claim_rewards(&self, owner: Address) -> Result<u64, LedgerError> {
        let lock = self.owner_lock(owner);
        let _guard = lock.lock().await;
        self.rewards.claim_rewards(owner).await
    }

    /// The owner's ordered subscription sequence, cancelled entries
    /// included (indices stay stable across cancellation).
    pub async fn get_user_subscriptions(&self, owner: Address) -> Vec<Subscription> {
        debug!(%owner, "subscriptions read");
        self.store.subscriptions(owner).await
    }

    /// The owner's unclaimed reward points.
    pub async fn get_user_reward_points(&self, owner: Address) -> u64 {
        self.store.reward_points(owner).await
    }

    /// Attach an event observer. The handle detaches on drop.
    pub fn subscribe_events(&self) -> EventSubscription {
        self.bus.subscribe()
    }
}
