//! Funds-movement effect interface.
//!
//! The ledger never moves currency itself; it asks a [`TokenTransfer`]
//! handler to do it. Production deployments bridge this to whatever
//! settlement rail they sit on; `stipend-ledger` ships an in-memory bank
//! handler, and tests use the same handler with seeded balances.

use crate::identifiers::{Address, TokenAddress};
use crate::types::Amount;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Errors from a funds transfer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TransferError {
    /// The source account cannot cover the transfer.
    #[error("insufficient funds in {token}: need {needed}, have {available}")]
    InsufficientFunds {
        /// Token the transfer was denominated in
        token: TokenAddress,
        /// Amount the transfer required
        needed: Amount,
        /// Amount actually available
        available: Amount,
    },

    /// The handler refused the transfer for a rail-specific reason, e.g.
    /// a token contract rejecting for missing allowance.
    #[error("transfer rejected: {reason}")]
    Rejected {
        /// Handler-specific explanation
        reason: String,
    },
}

/// Moves currency between accounts.
///
/// A transfer either fully completes or fully fails; the handler must not
/// leave funds debited without the matching credit.
#[async_trait]
pub trait TokenTransfer: Send + Sync {
    /// Move `amount` of `token` from `from` to `to`.
    async fn transfer(
        &self,
        token: TokenAddress,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TransferError>;
}

#[async_trait]
impl<T: TokenTransfer + ?Sized> TokenTransfer for Arc<T> {
    async fn transfer(
        &self,
        token: TokenAddress,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        (**self).transfer(token, from, to, amount).await
    }
}
