//! Caller authorization.
//!
//! Roles are never stored on an account. They are resolved per call by
//! comparing the caller against the identities recorded on the resource.

use common::AccountId;
use serde::Serialize;

use crate::ledger::LedgerError;

/// Role an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Organizer,
    OrganizerOrOwner,
    Purchaser,
}

/// The identities a resource is guarded by.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Store {
        owner: &'a AccountId,
    },
    Event {
        owner: &'a AccountId,
        organizer: &'a AccountId,
    },
    Purchase {
        customer: &'a AccountId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }

    /// Turns a denial into `error`.
    pub fn or_reject(self, error: impl FnOnce() -> LedgerError) -> Result<(), LedgerError> {
        match self {
            Access::Allow => Ok(()),
            Access::Deny => Err(error()),
        }
    }
}

/// Decides whether `actor` holds `required` on `resource`.
///
/// A role that does not apply to the resource kind is denied.
pub fn authorize(actor: &AccountId, required: Role, resource: &Resource<'_>) -> Access {
    let allowed = match (required, resource) {
        (Role::Owner, Resource::Store { owner } | Resource::Event { owner, .. }) => {
            actor == *owner
        }
        (Role::Organizer, Resource::Event { organizer, .. }) => actor == *organizer,
        (Role::OrganizerOrOwner, Resource::Event { owner, organizer }) => {
            actor == *organizer || actor == *owner
        }
        (Role::Purchaser, Resource::Purchase { customer }) => actor == *customer,
        _ => false,
    };

    if allowed { Access::Allow } else { Access::Deny }
}

/// Roles an account currently holds across the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AccountRoles {
    pub is_owner: bool,
    /// Organizes at least one event.
    pub is_organizer: bool,
    /// Made at least one purchase.
    pub is_customer: bool,
}
