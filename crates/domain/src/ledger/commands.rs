//! Ledger commands.
//!
//! Commands carry plaintext credentials as [`Secret`], so they can be
//! deserialized from callers but never serialized back out.

use common::{AccountId, Amount, EventId, PurchaseId, Secret};
use serde::Deserialize;

/// Who is calling and how much value they attach.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallContext {
    pub caller: AccountId,
    #[serde(default)]
    pub value: Amount,
}

impl CallContext {
    pub fn new(caller: AccountId) -> Self {
        Self {
            caller,
            value: Amount::ZERO,
        }
    }

    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}

/// Command to create an event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub external_id: Secret,
    pub organizer: AccountId,
    pub name: String,
    pub incentive_bps: u32,
    pub ticket_price: Amount,
    pub tickets_on_sale: u32,
}

impl CreateEvent {
    pub fn new(
        external_id: impl Into<Secret>,
        organizer: AccountId,
        name: impl Into<String>,
        incentive_bps: u32,
        ticket_price: Amount,
        tickets_on_sale: u32,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            organizer,
            name: name.into(),
            incentive_bps,
            ticket_price,
            tickets_on_sale,
        }
    }
}

/// Command to buy tickets. The attached value must equal the total.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseTickets {
    pub event_id: EventId,
    pub quantity: u32,
    pub external_id: Secret,
    pub timestamp: u64,
    pub customer_id: Secret,
}

impl PurchaseTickets {
    pub fn new(
        event_id: EventId,
        quantity: u32,
        external_id: impl Into<Secret>,
        timestamp: u64,
        customer_id: impl Into<Secret>,
    ) -> Self {
        Self {
            event_id,
            quantity,
            external_id: external_id.into(),
            timestamp,
            customer_id: customer_id.into(),
        }
    }
}

/// Command to cancel a purchase by presenting its credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelPurchase {
    pub purchase_id: PurchaseId,
    pub external_id: Secret,
    pub customer_id: Secret,
}

impl CancelPurchase {
    pub fn new(
        purchase_id: PurchaseId,
        external_id: impl Into<Secret>,
        customer_id: impl Into<Secret>,
    ) -> Self {
        Self {
            purchase_id,
            external_id: external_id.into(),
            customer_id: customer_id.into(),
        }
    }
}

/// Every mutating ledger operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerCommand {
    OpenStore,
    SuspendStore,
    CloseStore,
    TransferOwnership { new_owner: AccountId },
    ReceiveFunds,
    CreateEvent(CreateEvent),
    StartTicketSales { event_id: EventId },
    SuspendTicketSales { event_id: EventId },
    EndTicketSales { event_id: EventId },
    CompleteEvent { event_id: EventId },
    SettleEvent { event_id: EventId },
    CancelEvent { event_id: EventId },
    PurchaseTickets(PurchaseTickets),
    CancelPurchase(CancelPurchase),
    RefundPurchase {
        event_id: EventId,
        purchase_id: PurchaseId,
    },
    CheckIn { purchase_id: PurchaseId },
}

impl LedgerCommand {
    /// Operation name as recorded on journaled notifications.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::OpenStore => "openStore",
            LedgerCommand::SuspendStore => "suspendStore",
            LedgerCommand::CloseStore => "closeStore",
            LedgerCommand::TransferOwnership { .. } => "transferOwnership",
            LedgerCommand::ReceiveFunds => "receiveFunds",
            LedgerCommand::CreateEvent(_) => "createEvent",
            LedgerCommand::StartTicketSales { .. } => "startTicketSales",
            LedgerCommand::SuspendTicketSales { .. } => "suspendTicketSales",
            LedgerCommand::EndTicketSales { .. } => "endTicketSales",
            LedgerCommand::CompleteEvent { .. } => "completeEvent",
            LedgerCommand::SettleEvent { .. } => "settleEvent",
            LedgerCommand::CancelEvent { .. } => "cancelEvent",
            LedgerCommand::PurchaseTickets(_) => "purchaseTickets",
            LedgerCommand::CancelPurchase(_) => "cancelPurchase",
            LedgerCommand::RefundPurchase { .. } => "refundPurchase",
            LedgerCommand::CheckIn { .. } => "checkIn",
        }
    }

    /// Returns true if the operation accepts attached value.
    pub fn is_payable(&self) -> bool {
        matches!(
            self,
            LedgerCommand::ReceiveFunds | LedgerCommand::PurchaseTickets(_)
        )
    }
}
