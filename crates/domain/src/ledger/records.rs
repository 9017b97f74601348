//! Entity records held by the ledger.

use common::{AccountId, Amount, CredentialHash, EventId, PurchaseId};
use serde::{Deserialize, Serialize};

use super::{EventStatus, PurchaseStatus, StoreStatus};

/// The store singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub status: StoreStatus,
    pub name: String,
    pub owner: AccountId,
    /// Incentives earned from settled events.
    pub settled_balance: Amount,
    /// Value received outside of purchases.
    pub excess_balance: Amount,
    /// Sum of every event's refundable balance.
    pub refundable_balance: Amount,
    pub counter_events: u64,
    pub counter_purchases: u64,
}

impl Store {
    pub fn new(owner: AccountId, name: impl Into<String>) -> Self {
        Self {
            status: StoreStatus::Created,
            name: name.into(),
            owner,
            settled_balance: Amount::ZERO,
            excess_balance: Amount::ZERO,
            refundable_balance: Amount::ZERO,
            counter_events: 0,
            counter_purchases: 0,
        }
    }

    pub fn next_event_id(&self) -> EventId {
        EventId::new(self.counter_events).next()
    }

    pub fn next_purchase_id(&self) -> PurchaseId {
        PurchaseId::new(self.counter_purchases).next()
    }

    /// Value swept to the owner when the store closes.
    pub fn sweepable(&self) -> Amount {
        self.settled_balance.saturating_add(self.excess_balance)
    }
}

/// A ticketed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub status: EventStatus,
    pub external_id_hash: CredentialHash,
    pub organizer: AccountId,
    pub name: String,
    pub store_incentive_bps: u32,
    pub ticket_price: Amount,
    pub tickets_on_sale: u32,
    pub tickets_sold: u32,
    pub tickets_left: u32,
    pub tickets_cancelled: u32,
    pub tickets_refunded: u32,
    pub tickets_checked_in: u32,
    /// Totals of Completed and CheckedIn purchases, until settlement.
    pub balance: Amount,
    /// Totals of Cancelled purchases awaiting refund.
    pub refundable_balance: Amount,
}

/// A ticket purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub status: PurchaseStatus,
    pub external_id_hash: CredentialHash,
    /// Caller supplied, always greater than 0.
    pub timestamp: u64,
    pub customer: AccountId,
    pub customer_id_hash: CredentialHash,
    pub quantity: u32,
    pub total: Amount,
    pub event_id: EventId,
}
