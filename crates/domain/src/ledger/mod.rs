//! The ticket-marketplace ledger aggregate and related types.

mod aggregate;
mod commands;
mod info;
mod notifications;
mod records;
mod service;
mod state;

pub use aggregate::{Allocation, Genesis, Ledger};
pub use commands::*;
pub use info::{EventInfo, EventSalesInfo, PurchaseInfo, StoreInfo};
pub use notifications::{
    CustomerCheckedInData, EventCancelledData, EventCreatedData, EventSettledData,
    EventTransitionData, FundsReceivedData, Notification, OwnershipTransferredData,
    PurchaseCancelledData, PurchaseCompletedData, PurchaseRefundedData, StoreClosedData,
    StoreTransitionData,
};
pub use records::{Event, Purchase, Store};
pub use service::LedgerService;
pub use state::{EventStatus, PurchaseStatus, StoreStatus};

use common::{AccountId, Amount, EventId, PurchaseId};
use serde::Serialize;
use thiserror::Error;

/// Broad category of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Wrong caller for the operation.
    Authorization,
    /// Missing or out-of-range input.
    Validation,
    /// Operation incompatible with the current status.
    StateConflict,
    /// Attached value does not match what the operation requires.
    MonetaryMismatch,
    /// Unknown id.
    NotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Authorization => "authorization",
            ErrorKind::Validation => "validation",
            ErrorKind::StateConflict => "state_conflict",
            ErrorKind::MonetaryMismatch => "monetary_mismatch",
            ErrorKind::NotFound => "not_found",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during ledger operations.
///
/// Every variant carries an immutable code, see [`LedgerError::code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Caller {caller} is not the store owner")]
    NotOwner { caller: AccountId },

    #[error("Event {0} not found")]
    EventNotFound(EventId),

    #[error("Purchase {0} not found")]
    PurchaseNotFound(PurchaseId),

    #[error("Store is not open (status {status})")]
    StoreNotOpen { status: StoreStatus },

    #[error("Invalid store transition: cannot {action} from {status} state")]
    InvalidStoreTransition {
        status: StoreStatus,
        action: &'static str,
    },

    #[error("New owner is required")]
    NewOwnerRequired,

    #[error("Organizer {organizer} is a program account")]
    OrganizerIsProgram { organizer: AccountId },

    #[error("Caller {caller} is not the organizer of event {event_id}")]
    NotOrganizer { caller: AccountId, event_id: EventId },

    #[error("Caller {caller} is neither the organizer of event {event_id} nor the owner")]
    NotOrganizerOrOwner { caller: AccountId, event_id: EventId },

    #[error("Event external id is required")]
    EventExternalIdRequired,

    #[error("Event name is required")]
    EventNameRequired,

    #[error("Store incentive {bps} exceeds 10000 basis points")]
    IncentiveOutOfRange { bps: u32 },

    #[error("Tickets on sale must be greater than 0")]
    NoTicketsOnSale,

    #[error("Invalid event transition: cannot {action} event {event_id} from {status} state")]
    InvalidEventTransition {
        event_id: EventId,
        status: EventStatus,
        action: &'static str,
    },

    #[error("Event {event_id} is settled and cannot be cancelled")]
    SettledEventNotCancellable { event_id: EventId },

    #[error("Ticket sales for event {event_id} are not open (status {status})")]
    SalesNotStarted {
        event_id: EventId,
        status: EventStatus,
    },

    #[error("Quantity must be greater than 0")]
    ZeroQuantity,

    #[error("Not enough tickets: requested {requested}, {left} left")]
    NotEnoughTickets { requested: u32, left: u32 },

    #[error("Purchase external id is required")]
    PurchaseExternalIdRequired,

    #[error("Purchase timestamp is required")]
    TimestampRequired,

    #[error("Customer id is required")]
    CustomerIdRequired,

    #[error("Attached value {attached} does not equal the total {expected}")]
    ValueMismatch { expected: Amount, attached: Amount },

    #[error("Insufficient funds: {available} available, {required} required")]
    InsufficientFunds { available: Amount, required: Amount },

    #[error("Credentials do not match purchase {purchase_id}")]
    CredentialMismatch { purchase_id: PurchaseId },

    #[error("Invalid purchase transition: cannot {action} purchase {purchase_id} from {status} state")]
    InvalidPurchaseTransition {
        purchase_id: PurchaseId,
        status: PurchaseStatus,
        action: &'static str,
    },

    #[error("Event {event_id} no longer accepts cancellations (status {status})")]
    CancellationsClosed {
        event_id: EventId,
        status: EventStatus,
    },

    #[error("Purchase {purchase_id} does not belong to event {event_id}")]
    PurchaseNotInEvent {
        purchase_id: PurchaseId,
        event_id: EventId,
    },

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Caller {caller} is not the purchaser of purchase {purchase_id}")]
    NotPurchaser {
        caller: AccountId,
        purchase_id: PurchaseId,
    },

    #[error("A value greater than 0 is required")]
    ValueRequired,

    #[error("Operation {operation} does not accept value (attached {attached})")]
    NotPayable {
        operation: &'static str,
        attached: Amount,
    },
}

impl LedgerError {
    /// Immutable tag of the violated precondition.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::NotOwner { .. } => "E001",
            LedgerError::EventNotFound(_) => "E002",
            LedgerError::PurchaseNotFound(_) => "E003",
            LedgerError::StoreNotOpen { .. } => "E004",
            LedgerError::InvalidStoreTransition { .. } => "E005",
            LedgerError::NewOwnerRequired => "E006",
            LedgerError::OrganizerIsProgram { .. } => "E010",
            LedgerError::NotOrganizer { .. } => "E011",
            LedgerError::NotOrganizerOrOwner { .. } => "E012",
            LedgerError::EventExternalIdRequired => "E013",
            LedgerError::EventNameRequired => "E014",
            LedgerError::IncentiveOutOfRange { .. } => "E015",
            LedgerError::NoTicketsOnSale => "E016",
            LedgerError::InvalidEventTransition { .. } => "E020",
            LedgerError::SettledEventNotCancellable { .. } => "E022",
            LedgerError::SalesNotStarted { .. } => "E023",
            LedgerError::ZeroQuantity => "E025",
            LedgerError::NotEnoughTickets { .. } => "E026",
            LedgerError::PurchaseExternalIdRequired => "E027",
            LedgerError::TimestampRequired => "E028",
            LedgerError::CustomerIdRequired => "E029",
            LedgerError::ValueMismatch { .. } => "E030",
            LedgerError::InsufficientFunds { .. } => "E031",
            LedgerError::CredentialMismatch { .. } => "E032",
            LedgerError::InvalidPurchaseTransition { .. } => "E033",
            LedgerError::CancellationsClosed { .. } => "E034",
            LedgerError::PurchaseNotInEvent { .. } => "E035",
            LedgerError::AmountOverflow => "E036",
            LedgerError::NotPurchaser { .. } => "E037",
            LedgerError::ValueRequired => "E038",
            LedgerError::NotPayable { .. } => "E039",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotOwner { .. }
            | LedgerError::NotOrganizer { .. }
            | LedgerError::NotOrganizerOrOwner { .. }
            | LedgerError::CredentialMismatch { .. }
            | LedgerError::NotPurchaser { .. } => ErrorKind::Authorization,

            LedgerError::EventNotFound(_) | LedgerError::PurchaseNotFound(_) => {
                ErrorKind::NotFound
            }

            LedgerError::StoreNotOpen { .. }
            | LedgerError::InvalidStoreTransition { .. }
            | LedgerError::InvalidEventTransition { .. }
            | LedgerError::SettledEventNotCancellable { .. }
            | LedgerError::SalesNotStarted { .. }
            | LedgerError::InvalidPurchaseTransition { .. }
            | LedgerError::CancellationsClosed { .. } => ErrorKind::StateConflict,

            LedgerError::ValueMismatch { .. }
            | LedgerError::InsufficientFunds { .. }
            | LedgerError::NotPayable { .. } => ErrorKind::MonetaryMismatch,

            LedgerError::NewOwnerRequired
            | LedgerError::OrganizerIsProgram { .. }
            | LedgerError::EventExternalIdRequired
            | LedgerError::EventNameRequired
            | LedgerError::IncentiveOutOfRange { .. }
            | LedgerError::NoTicketsOnSale
            | LedgerError::ZeroQuantity
            | LedgerError::NotEnoughTickets { .. }
            | LedgerError::PurchaseExternalIdRequired
            | LedgerError::TimestampRequired
            | LedgerError::CustomerIdRequired
            | LedgerError::PurchaseNotInEvent { .. }
            | LedgerError::AmountOverflow
            | LedgerError::ValueRequired => ErrorKind::Validation,
        }
    }
}
