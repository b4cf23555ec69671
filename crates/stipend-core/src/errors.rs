//! Error taxonomy for ledger operations.
//!
//! Every engine operation fails atomically: when any of these errors is
//! returned, no mutation is visible to readers and no event has been
//! published. Callers surface a generic message per failed operation and
//! log the underlying variant; they must never assume partial success.

use crate::identifiers::Address;
use crate::transfer::TransferError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of ledger errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The input itself was unacceptable
    Validation,
    /// The operation is invalid in the entity's current state
    State,
    /// Funds movement failed
    Transfer,
    /// The referenced entity does not exist
    NotFound,
}

/// Errors from subscription and rewards operations.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LedgerError {
    /// Subscription names a service nobody registered.
    #[error("service {name:?} is not registered")]
    UnknownService {
        /// The unregistered name
        name: String,
    },

    /// A service with this name already exists; services are immutable.
    #[error("service {name:?} is already registered")]
    ServiceAlreadyRegistered {
        /// The duplicate name
        name: String,
    },

    /// Payment amount must be positive.
    #[error("subscription amount must be positive")]
    InvalidAmount,

    /// Payment frequency must be positive.
    #[error("payment frequency must be positive")]
    InvalidFrequency,

    /// Caller is not the ledger admin.
    #[error("caller {caller} is not the ledger admin")]
    NotAdmin {
        /// The rejected caller
        caller: Address,
    },

    /// Payment attempted before the subscription's due time.
    #[error("payment not due until {next_payment} (now {now})")]
    TooEarly {
        /// Caller's current time
        now: u64,
        /// When the payment becomes due
        next_payment: u64,
    },

    /// Payment attempted against a cancelled subscription.
    #[error("subscription {index} of {owner} is inactive")]
    InactiveSubscription {
        /// Subscription owner
        owner: Address,
        /// Index in the owner's sequence
        index: usize,
    },

    /// Cancellation attempted on an already-cancelled subscription.
    ///
    /// Double-cancel is an explicit error rather than a silent no-op so
    /// callers can detect it.
    #[error("subscription {index} of {owner} is already inactive")]
    AlreadyInactive {
        /// Subscription owner
        owner: Address,
        /// Index in the owner's sequence
        index: usize,
    },

    /// Claim attempted below the reward threshold.
    #[error("{points} reward points held, {threshold} required to claim")]
    InsufficientPoints {
        /// Points currently held
        points: u64,
        /// Configured claim threshold
        threshold: u64,
    },

    /// No subscription at the given index for this owner.
    #[error("no subscription {index} for owner {owner}")]
    SubscriptionNotFound {
        /// Subscription owner
        owner: Address,
        /// Out-of-range index
        index: usize,
    },

    /// Funds movement failed.
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl LedgerError {
    /// Classify this error per the ledger's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownService { .. }
            | Self::ServiceAlreadyRegistered { .. }
            | Self::InvalidAmount
            | Self::InvalidFrequency
            | Self::NotAdmin { .. } => ErrorKind::Validation,
            Self::TooEarly { .. }
            | Self::InactiveSubscription { .. }
            | Self::AlreadyInactive { .. }
            | Self::InsufficientPoints { .. } => ErrorKind::State,
            Self::Transfer(_) => ErrorKind::Transfer,
            Self::SubscriptionNotFound { .. } => ErrorKind::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::TokenAddress;

    #[test]
    fn kinds_partition_the_taxonomy() {
        assert_eq!(
            LedgerError::UnknownService {
                name: "x".to_string()
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            LedgerError::TooEarly {
                now: 1,
                next_payment: 2
            }
            .kind(),
            ErrorKind::State
        );
        assert_eq!(
            LedgerError::SubscriptionNotFound {
                owner: Address::ZERO,
                index: 3
            }
            .kind(),
            ErrorKind::NotFound
        );
        let transfer = LedgerError::from(TransferError::InsufficientFunds {
            token: TokenAddress::NATIVE,
            needed: 10,
            available: 3,
        });
        assert_eq!(transfer.kind(), ErrorKind::Transfer);
    }
}
