//! Lifecycle state machines for the store, events and purchases.

use serde::{Deserialize, Serialize};

/// The state of the store.
///
/// ```text
/// Created ──► Open ◄──► Suspended
///              │            │
///              └────────────┴──► Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StoreStatus {
    #[default]
    Created,
    Open,
    Suspended,
    /// Terminal.
    Closed,
}

impl StoreStatus {
    pub fn can_open(&self) -> bool {
        matches!(self, StoreStatus::Created | StoreStatus::Suspended)
    }

    pub fn can_suspend(&self) -> bool {
        matches!(self, StoreStatus::Open)
    }

    pub fn can_close(&self) -> bool {
        matches!(self, StoreStatus::Open | StoreStatus::Suspended)
    }

    /// Returns true if new events and purchases are accepted.
    pub fn is_open(&self) -> bool {
        matches!(self, StoreStatus::Open)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StoreStatus::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Created => "Created",
            StoreStatus::Open => "Open",
            StoreStatus::Suspended => "Suspended",
            StoreStatus::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The state of a ticketed event.
///
/// ```text
/// Created ──► SalesStarted ◄──► SalesSuspended
///                  │                  │
///                  └──► SalesFinished ◄┘
///                            │
///                       Completed ──► Settled
///
/// any non-terminal ──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EventStatus {
    #[default]
    Created,
    SalesStarted,
    SalesSuspended,
    SalesFinished,
    Completed,
    /// Terminal.
    Settled,
    /// Terminal.
    Cancelled,
}

impl EventStatus {
    pub fn can_start_sales(&self) -> bool {
        matches!(self, EventStatus::Created | EventStatus::SalesSuspended)
    }

    pub fn can_suspend_sales(&self) -> bool {
        matches!(self, EventStatus::SalesStarted)
    }

    pub fn can_end_sales(&self) -> bool {
        matches!(self, EventStatus::SalesStarted | EventStatus::SalesSuspended)
    }

    pub fn can_complete(&self) -> bool {
        matches!(self, EventStatus::SalesFinished)
    }

    pub fn can_settle(&self) -> bool {
        matches!(self, EventStatus::Completed)
    }

    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if tickets can be bought.
    pub fn is_selling(&self) -> bool {
        matches!(self, EventStatus::SalesStarted)
    }

    /// Returns true if customers may still cancel their purchases.
    pub fn accepts_cancellations(&self) -> bool {
        matches!(
            self,
            EventStatus::SalesStarted
                | EventStatus::SalesSuspended
                | EventStatus::SalesFinished
                | EventStatus::Cancelled
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EventStatus::Settled | EventStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Created => "Created",
            EventStatus::SalesStarted => "SalesStarted",
            EventStatus::SalesSuspended => "SalesSuspended",
            EventStatus::SalesFinished => "SalesFinished",
            EventStatus::Completed => "Completed",
            EventStatus::Settled => "Settled",
            EventStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The state of a ticket purchase.
///
/// ```text
/// Completed ──► Cancelled ──► Refunded
///     │
///     └──► CheckedIn
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseStatus {
    Completed,
    /// Awaiting refund.
    Cancelled,
    /// Terminal.
    Refunded,
    /// Terminal.
    CheckedIn,
}

impl PurchaseStatus {
    pub const ALL: [PurchaseStatus; 4] = [
        PurchaseStatus::Completed,
        PurchaseStatus::Cancelled,
        PurchaseStatus::Refunded,
        PurchaseStatus::CheckedIn,
    ];

    /// Returns true if the purchase may move to `target`.
    pub fn can_transition_to(&self, target: PurchaseStatus) -> bool {
        matches!(
            (self, target),
            (PurchaseStatus::Completed, PurchaseStatus::Cancelled)
                | (PurchaseStatus::Cancelled, PurchaseStatus::Refunded)
                | (PurchaseStatus::Completed, PurchaseStatus::CheckedIn)
        )
    }

    pub fn can_cancel(&self) -> bool {
        self.can_transition_to(PurchaseStatus::Cancelled)
    }

    pub fn can_refund(&self) -> bool {
        self.can_transition_to(PurchaseStatus::Refunded)
    }

    pub fn can_check_in(&self) -> bool {
        self.can_transition_to(PurchaseStatus::CheckedIn)
    }

    /// Returns true if the purchase total still sits in the event balance.
    pub fn holds_event_balance(&self) -> bool {
        matches!(self, PurchaseStatus::Completed | PurchaseStatus::CheckedIn)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PurchaseStatus::Refunded | PurchaseStatus::CheckedIn)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Completed => "Completed",
            PurchaseStatus::Cancelled => "Cancelled",
            PurchaseStatus::Refunded => "Refunded",
            PurchaseStatus::CheckedIn => "CheckedIn",
        }
    }
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
