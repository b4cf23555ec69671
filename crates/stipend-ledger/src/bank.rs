//! In-memory funds handler.
//!
//! Implements the `TokenTransfer` effect against per-token account
//! balances held in memory. This is the handler embedders get from
//! [`crate::Ledger::in_memory`] and the one the test suite seeds;
//! deployments settling on an external rail supply their own handler.

use async_trait::async_trait;
use std::collections::HashMap;
use stipend_core::{Address, Amount, TokenAddress, TokenTransfer, TransferError};
use tokio::sync::RwLock;

/// Balance book keyed by `(token, account)`.
#[derive(Default)]
pub struct InMemoryBank {
    accounts: RwLock<HashMap<(TokenAddress, Address), Amount>>,
}

impl InMemoryBank {
    /// Create an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account. Used to seed balances; deposits saturate rather
    /// than wrap.
    pub async fn deposit(&self, token: TokenAddress, account: Address, amount: Amount) {
        let mut accounts = self.accounts.write().await;
        let balance = accounts.entry((token, account)).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Current balance of an account (zero if never credited).
    pub async fn balance(&self, token: TokenAddress, account: Address) -> Amount {
        self.accounts
            .read()
            .await
            .get(&(token, account))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl TokenTransfer for InMemoryBank {
    async fn transfer(
        &self,
        token: TokenAddress,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let mut accounts = self.accounts.write().await;
        let available = accounts.get(&(token, from)).copied().unwrap_or(0);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                token,
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        accounts.insert((token, from), available - amount);
        let credit = accounts.entry((token, to)).or_insert(0);
        *credit = credit.saturating_add(amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(seed: u8) -> Address {
        Address::from_bytes([seed; 20])
    }

    #[tokio::test]
    async fn transfer_debits_and_credits() {
        let bank = InMemoryBank::new();
        bank.deposit(TokenAddress::NATIVE, acct(1), 500).await;
        bank.transfer(TokenAddress::NATIVE, acct(1), acct(2), 200)
            .await
            .unwrap();
        assert_eq!(bank.balance(TokenAddress::NATIVE, acct(1)).await, 300);
        assert_eq!(bank.balance(TokenAddress::NATIVE, acct(2)).await, 200);
    }

    #[tokio::test]
    async fn shortfall_fails_and_moves_nothing() {
        let bank = InMemoryBank::new();
        bank.deposit(TokenAddress::NATIVE, acct(1), 100).await;
        let err = bank
            .transfer(TokenAddress::NATIVE, acct(1), acct(2), 101)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TransferError::InsufficientFunds {
                token: TokenAddress::NATIVE,
                needed: 101,
                available: 100,
            }
        );
        assert_eq!(bank.balance(TokenAddress::NATIVE, acct(1)).await, 100);
        assert_eq!(bank.balance(TokenAddress::NATIVE, acct(2)).await, 0);
    }

    #[tokio::test]
    async fn balances_are_scoped_per_token() {
        let bank = InMemoryBank::new();
        let token = TokenAddress::from_bytes([9u8; 20]);
        bank.deposit(token, acct(1), 50).await;
        assert_eq!(bank.balance(TokenAddress::NATIVE, acct(1)).await, 0);
        assert_eq!(bank.balance(token, acct(1)).await, 50);
    }

    #[tokio::test]
    async fn self_transfer_is_a_funded_no_op() {
        let bank = InMemoryBank::new();
        bank.deposit(TokenAddress::NATIVE, acct(1), 100).await;
        bank.transfer(TokenAddress::NATIVE, acct(1), acct(1), 100)
            .await
            .unwrap();
        assert_eq!(bank.balance(TokenAddress::NATIVE, acct(1)).await, 100);
        assert!(bank
            .transfer(TokenAddress::NATIVE, acct(1), acct(1), 101)
            .await
            .is_err());
    }
}
