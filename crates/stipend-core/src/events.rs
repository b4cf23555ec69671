//! Ledger state-transition events.

use crate::identifiers::Address;
use crate::types::Amount;
use serde::{Deserialize, Serialize};

/// Notification published after a ledger mutation commits.
///
/// Events carry the owner so observers can filter for the account they
/// render. Events for one owner are delivered in the order the underlying
/// mutations committed; no ordering is promised across owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A new subscription was appended to the owner's sequence.
    SubscriptionCreated {
        /// Subscription owner
        owner: Address,
        /// Service subscribed to
        service_name: String,
        /// Per-cycle payment amount
        amount: Amount,
    },

    /// A due payment was charged and the schedule advanced one cycle.
    PaymentProcessed {
        /// Subscription owner
        owner: Address,
        /// Service that was paid
        service_name: String,
        /// Amount charged
        amount: Amount,
    },
}

impl LedgerEvent {
    /// Owner the event concerns, for observer-side filtering.
    pub fn owner(&self) -> Address {
        match self {
            Self::SubscriptionCreated { owner, .. } | Self::PaymentProcessed { owner, .. } => {
                *owner
            }
        }
    }
}
