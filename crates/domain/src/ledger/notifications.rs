//! Ledger notifications.
//!
//! Every committed operation emits at least one notification. They are the
//! only record the journal keeps and the only way new ids reach callers.

use common::{AccountId, Amount, CredentialHash, EventId, PurchaseId};
use serde::{Deserialize, Serialize};

use crate::accounting::Payout;
use crate::aggregate::DomainEvent;

use super::{EventStatus, StoreStatus};

/// Notifications the ledger can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Notification {
    StoreOpened(StoreTransitionData),
    StoreSuspended(StoreTransitionData),
    StoreClosed(StoreClosedData),
    OwnershipTransferred(OwnershipTransferredData),
    FundsReceived(FundsReceivedData),

    EventCreated(EventCreatedData),
    EventSalesStarted(EventTransitionData),
    EventSalesSuspended(EventTransitionData),
    EventSalesFinished(EventTransitionData),
    EventCompleted(EventTransitionData),
    EventSettled(EventSettledData),
    EventCancelled(EventCancelledData),

    PurchaseCompleted(PurchaseCompletedData),
    PurchaseCancelled(PurchaseCancelledData),
    PurchaseRefunded(PurchaseRefundedData),
    CustomerCheckedIn(CustomerCheckedInData),
}

impl DomainEvent for Notification {
    fn event_type(&self) -> &'static str {
        match self {
            Notification::StoreOpened(_) => "StoreOpened",
            Notification::StoreSuspended(_) => "StoreSuspended",
            Notification::StoreClosed(_) => "StoreClosed",
            Notification::OwnershipTransferred(_) => "OwnershipTransferred",
            Notification::FundsReceived(_) => "FundsReceived",
            Notification::EventCreated(_) => "EventCreated",
            Notification::EventSalesStarted(_) => "EventSalesStarted",
            Notification::EventSalesSuspended(_) => "EventSalesSuspended",
            Notification::EventSalesFinished(_) => "EventSalesFinished",
            Notification::EventCompleted(_) => "EventCompleted",
            Notification::EventSettled(_) => "EventSettled",
            Notification::EventCancelled(_) => "EventCancelled",
            Notification::PurchaseCompleted(_) => "PurchaseCompleted",
            Notification::PurchaseCancelled(_) => "PurchaseCancelled",
            Notification::PurchaseRefunded(_) => "PurchaseRefunded",
            Notification::CustomerCheckedIn(_) => "CustomerCheckedIn",
        }
    }

    fn subject_type(&self) -> &'static str {
        match self {
            Notification::StoreOpened(_)
            | Notification::StoreSuspended(_)
            | Notification::StoreClosed(_)
            | Notification::OwnershipTransferred(_)
            | Notification::FundsReceived(_) => "Store",

            Notification::EventCreated(_)
            | Notification::EventSalesStarted(_)
            | Notification::EventSalesSuspended(_)
            | Notification::EventSalesFinished(_)
            | Notification::EventCompleted(_)
            | Notification::EventSettled(_)
            | Notification::EventCancelled(_) => "Event",

            Notification::PurchaseCompleted(_)
            | Notification::PurchaseCancelled(_)
            | Notification::PurchaseRefunded(_)
            | Notification::CustomerCheckedIn(_) => "Purchase",
        }
    }

    fn subject_id(&self) -> u64 {
        match self {
            Notification::StoreOpened(_)
            | Notification::StoreSuspended(_)
            | Notification::StoreClosed(_)
            | Notification::OwnershipTransferred(_)
            | Notification::FundsReceived(_) => 0,

            Notification::EventCreated(data) => data.event_id.as_u64(),
            Notification::EventSalesStarted(data)
            | Notification::EventSalesSuspended(data)
            | Notification::EventSalesFinished(data)
            | Notification::EventCompleted(data) => data.event_id.as_u64(),
            Notification::EventSettled(data) => data.event_id.as_u64(),
            Notification::EventCancelled(data) => data.event_id.as_u64(),

            Notification::PurchaseCompleted(data) => data.purchase_id.as_u64(),
            Notification::PurchaseCancelled(data) => data.purchase_id.as_u64(),
            Notification::PurchaseRefunded(data) => data.purchase_id.as_u64(),
            Notification::CustomerCheckedIn(data) => data.purchase_id.as_u64(),
        }
    }
}

impl Notification {
    /// Value this notification sends out of custody. Zero amounts are skipped.
    pub fn payouts(&self) -> Vec<Payout> {
        let payouts = match self {
            Notification::StoreClosed(data) => vec![Payout {
                to: data.owner.clone(),
                amount: data.swept,
            }],
            Notification::EventSettled(data) => {
                let mut payouts = vec![Payout {
                    to: data.organizer.clone(),
                    amount: data.organizer_share,
                }];
                if let Some(owner) = &data.incentive_paid_to {
                    payouts.push(Payout {
                        to: owner.clone(),
                        amount: data.incentive,
                    });
                }
                payouts
            }
            Notification::PurchaseRefunded(data) => vec![Payout {
                to: data.customer.clone(),
                amount: data.total,
            }],
            _ => return Vec::new(),
        };

        payouts
            .into_iter()
            .filter(|payout| !payout.amount.is_zero())
            .collect()
    }
}

/// Data for StoreOpened and StoreSuspended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTransitionData {
    pub previous: StoreStatus,
    pub status: StoreStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreClosedData {
    pub previous: StoreStatus,
    pub owner: AccountId,
    /// Settled plus excess balance paid to the owner.
    pub swept: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferredData {
    pub previous_owner: AccountId,
    pub new_owner: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsReceivedData {
    pub sender: AccountId,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCreatedData {
    pub event_id: EventId,
    pub external_id_hash: CredentialHash,
    pub organizer: AccountId,
    pub name: String,
    pub store_incentive_bps: u32,
    pub ticket_price: Amount,
    pub tickets_on_sale: u32,
}

/// Data for the sales lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTransitionData {
    pub event_id: EventId,
    pub previous: EventStatus,
    pub status: EventStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSettledData {
    pub event_id: EventId,
    pub organizer: AccountId,
    /// Credited to the store's settled balance, or paid out directly when
    /// `incentive_paid_to` is set.
    pub incentive: Amount,
    /// Paid to the organizer.
    pub organizer_share: Amount,
    /// Owner receiving the incentive when the store is already closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incentive_paid_to: Option<AccountId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCancelledData {
    pub event_id: EventId,
    pub previous: EventStatus,
    pub cancelled_by: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseCompletedData {
    pub purchase_id: PurchaseId,
    pub event_id: EventId,
    pub customer: AccountId,
    pub external_id_hash: CredentialHash,
    pub customer_id_hash: CredentialHash,
    pub timestamp: u64,
    pub quantity: u32,
    pub total: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseCancelledData {
    pub purchase_id: PurchaseId,
    pub event_id: EventId,
    pub quantity: u32,
    pub total: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRefundedData {
    pub purchase_id: PurchaseId,
    pub event_id: EventId,
    pub customer: AccountId,
    pub quantity: u32,
    pub total: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCheckedInData {
    pub purchase_id: PurchaseId,
    pub event_id: EventId,
    pub customer: AccountId,
    pub quantity: u32,
}
