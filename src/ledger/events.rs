//! Ledger notifications
//!
//! Every successful mutation emits exactly one event: `Transfer` for direct
//! and delegated transfers, `Approval` for allowance updates. Failed
//! operations emit nothing. The ledger keeps a bounded history of recent
//! events for observers.

use crate::ledger::address::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of events retained in the ledger history
pub const EVENT_HISTORY_LIMIT: usize = 256;

/// Emitted when tokens move, directly or via delegated transfer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub value: u128,
    pub timestamp: DateTime<Utc>,
}

/// Emitted when an owner sets a spender's allowance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub owner: Address,
    pub spender: Address,
    pub value: u128,
    pub timestamp: DateTime<Utc>,
}

/// A ledger notification, as recorded in the event history
///
/// Externally tagged: serde's internally-tagged representation buffers
/// fields through an intermediate that cannot carry u128 amounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    Transfer(TransferEvent),
    Approval(ApprovalEvent),
}

impl TransferEvent {
    pub fn new(from: Address, to: Address, value: u128) -> Self {
        Self {
            from,
            to,
            value,
            timestamp: Utc::now(),
        }
    }
}

impl ApprovalEvent {
    pub fn new(owner: Address, spender: Address, value: u128) -> Self {
        Self {
            owner,
            spender,
            value,
            timestamp: Utc::now(),
        }
    }
}
