//! Ledger fixtures.

use crate::time::ManualClock;
use std::sync::Arc;
use stipend_core::{Address, Amount, LedgerConfig, LedgerError, TokenAddress};
use stipend_ledger::{InMemoryBank, Ledger};

/// Deterministic address from a seed byte.
pub fn test_address(seed: u8) -> Address {
    Address::from_bytes([seed; 20])
}

/// Deterministic token address from a seed byte. Seed zero is the native
/// token.
pub fn test_token(seed: u8) -> TokenAddress {
    TokenAddress::from_bytes([seed; 20])
}

/// A fully wired ledger: in-memory bank, manual clock starting at zero,
/// and a funded treasury for reward payouts.
pub struct LedgerFixture {
    /// The assembled ledger under test
    pub ledger: Ledger,
    /// The funds handler, for seeding and asserting balances
    pub bank: Arc<InMemoryBank>,
    /// The controllable clock the ledger reads
    pub clock: ManualClock,
    /// The admin account wired into the configuration
    pub admin: Address,
}

impl LedgerFixture {
    /// Treasury the default configuration pays rewards from.
    pub const TREASURY: Address = Address([0xFE; 20]);
    /// Token the default configuration pays rewards in.
    pub const REWARD_TOKEN: TokenAddress = TokenAddress([0xFD; 20]);
    /// Reward-token balance the treasury is seeded with.
    pub const TREASURY_SEED: Amount = 1_000_000_000;

    /// Build a fixture with the default configuration and a funded
    /// treasury.
    pub async fn new() -> Self {
        let admin = test_address(0xAD);
        let config = LedgerConfig::new(admin, Self::REWARD_TOKEN, Self::TREASURY);
        Self::with_config(config).await
    }

    /// Build a fixture around a custom configuration. The treasury is
    /// seeded in the configured reward token.
    pub async fn with_config(config: LedgerConfig) -> Self {
        let admin = config.admin;
        let bank = Arc::new(InMemoryBank::new());
        let clock = ManualClock::new(0);
        let treasury = config.rewards.treasury;
        let reward_token = config.rewards.reward_token;
        let ledger = Ledger::new(config, bank.clone(), Arc::new(clock.clone()));
        bank.deposit(reward_token, treasury, Self::TREASURY_SEED).await;
        Self {
            ledger,
            bank,
            clock,
            admin,
        }
    }

    /// Register a service as the admin.
    pub async fn register_service(
        &self,
        name: &str,
        payout_wallet: Address,
    ) -> Result<(), LedgerError> {
        self.ledger
            .register_service(self.admin, name, payout_wallet)
            .await
    }

    /// Seed an owner's balance in `token`.
    pub async fn fund(&self, owner: Address, token: TokenAddress, amount: Amount) {
        self.bank.deposit(token, owner, amount).await;
    }
}
