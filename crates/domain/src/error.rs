//! Domain error types.

use journal::JournalError;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The ledger rejected the operation.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// An error occurred in the journal.
    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Returns the ledger rejection, if that is what this is.
    pub fn as_ledger(&self) -> Option<&LedgerError> {
        match self {
            DomainError::Ledger(e) => Some(e),
            _ => None,
        }
    }
}
