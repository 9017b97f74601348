//! Shared value types for the ticket ledger: identities, ids, amounts and
//! credential hashes.

mod amount;
mod credential;
mod types;

pub use amount::Amount;
pub use credential::{CredentialHash, Secret};
pub use types::{AccountId, AccountKind, EventId, PurchaseId};
