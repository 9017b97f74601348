use thiserror::Error;

use crate::Sequence;

/// Errors that can occur when interacting with the journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The journal head moved since the writer last observed it.
    #[error("Sequence conflict: expected head {expected}, found {actual}")]
    SequenceConflict { expected: Sequence, actual: Sequence },

    /// The batch handed to `append` is malformed.
    #[error("Invalid append: {0}")]
    InvalidAppend(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for journal operations.
pub type Result<T> = std::result::Result<T, JournalError>;
