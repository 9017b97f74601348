//! Domain layer for the ticket-marketplace ledger.
//!
//! This crate provides:
//! - Aggregate and DomainEvent traits, and a journal-backed CommandHandler
//! - The Ledger aggregate with store, event and purchase lifecycles
//! - Access control, precondition checks and the accounting engine
//! - LedgerService, the single-writer entry point for every operation

pub mod access;
pub mod accounting;
pub mod aggregate;
pub mod command;
pub mod error;
pub mod ledger;
pub mod validation;

pub use access::{Access, AccountRoles, Resource, Role, authorize};
pub use accounting::{AccountBook, IncentiveSplit, Payout, incentive_split, purchase_total};
pub use aggregate::{Aggregate, DomainEvent};
pub use command::{CommandHandler, CommandResult};
pub use error::DomainError;
pub use ledger::{
    Allocation, CallContext, CancelPurchase, CreateEvent, ErrorKind, Event, EventInfo,
    EventSalesInfo, EventStatus, Genesis, Ledger, LedgerCommand, LedgerError, LedgerService,
    Notification, Purchase, PurchaseInfo, PurchaseStatus, PurchaseTickets, Store, StoreInfo,
    StoreStatus,
};
