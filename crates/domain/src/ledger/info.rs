//! Read views returned by ledger queries.

use common::{AccountId, Amount, CredentialHash, EventId, PurchaseId};
use serde::Serialize;

use super::{Event, EventStatus, Purchase, PurchaseStatus, Store, StoreStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreInfo {
    pub status: StoreStatus,
    pub name: String,
    pub owner: AccountId,
    pub settled_balance: Amount,
    pub excess_balance: Amount,
    pub refundable_balance: Amount,
    pub counter_events: u64,
    pub counter_purchases: u64,
}

impl From<&Store> for StoreInfo {
    fn from(store: &Store) -> Self {
        Self {
            status: store.status,
            name: store.name.clone(),
            owner: store.owner.clone(),
            settled_balance: store.settled_balance,
            excess_balance: store.excess_balance,
            refundable_balance: store.refundable_balance,
            counter_events: store.counter_events,
            counter_purchases: store.counter_purchases,
        }
    }
}

/// Descriptive event fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventInfo {
    pub id: EventId,
    pub status: EventStatus,
    pub external_id_hash: CredentialHash,
    pub organizer: AccountId,
    pub name: String,
    pub store_incentive_bps: u32,
    pub ticket_price: Amount,
    pub tickets_on_sale: u32,
}

impl From<&Event> for EventInfo {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            status: event.status,
            external_id_hash: event.external_id_hash,
            organizer: event.organizer.clone(),
            name: event.name.clone(),
            store_incentive_bps: event.store_incentive_bps,
            ticket_price: event.ticket_price,
            tickets_on_sale: event.tickets_on_sale,
        }
    }
}

/// Sales counters and balances of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSalesInfo {
    pub id: EventId,
    pub status: EventStatus,
    pub tickets_on_sale: u32,
    pub tickets_sold: u32,
    pub tickets_left: u32,
    pub tickets_cancelled: u32,
    pub tickets_refunded: u32,
    pub tickets_checked_in: u32,
    pub balance: Amount,
    pub refundable_balance: Amount,
}

impl From<&Event> for EventSalesInfo {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            status: event.status,
            tickets_on_sale: event.tickets_on_sale,
            tickets_sold: event.tickets_sold,
            tickets_left: event.tickets_left,
            tickets_cancelled: event.tickets_cancelled,
            tickets_refunded: event.tickets_refunded,
            tickets_checked_in: event.tickets_checked_in,
            balance: event.balance,
            refundable_balance: event.refundable_balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseInfo {
    pub id: PurchaseId,
    pub status: PurchaseStatus,
    pub external_id_hash: CredentialHash,
    pub timestamp: u64,
    pub customer: AccountId,
    pub customer_id_hash: CredentialHash,
    pub quantity: u32,
    pub total: Amount,
    pub event_id: EventId,
}

impl From<&Purchase> for PurchaseInfo {
    fn from(purchase: &Purchase) -> Self {
        Self {
            id: purchase.id,
            status: purchase.status,
            external_id_hash: purchase.external_id_hash,
            timestamp: purchase.timestamp,
            customer: purchase.customer.clone(),
            customer_id_hash: purchase.customer_id_hash,
            quantity: purchase.quantity,
            total: purchase.total,
            event_id: purchase.event_id,
        }
    }
}
