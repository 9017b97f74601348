//! Node error types and the response error mapping.

use std::path::PathBuf;

use domain::DomainError;
use journal::JournalError;
use serde::Serialize;
use thiserror::Error;

/// Errors that stop the node.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Failed to read genesis file {path}: {source}")]
    GenesisRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid genesis document {path}: {source}")]
    GenesisFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid genesis: {0}")]
    Genesis(#[from] DomainError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Failed to initialize tracing: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
}

/// Error object written back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub kind: String,
    pub message: String,
}

impl ErrorBody {
    fn new(code: &str, kind: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    /// The request line could not be parsed.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new("INVALID_REQUEST", "validation", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(error = %message, "internal error");
        Self::new("INTERNAL", "internal", message)
    }
}

impl From<&DomainError> for ErrorBody {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Ledger(ledger_err) => Self::new(
                ledger_err.code(),
                ledger_err.kind().as_str(),
                ledger_err.to_string(),
            ),
            DomainError::Journal(JournalError::SequenceConflict { .. }) => {
                Self::new("JOURNAL_CONFLICT", "state_conflict", err.to_string())
            }
            _ => Self::internal(err.to_string()),
        }
    }
}

impl From<DomainError> for ErrorBody {
    fn from(err: DomainError) -> Self {
        Self::from(&err)
    }
}

impl From<domain::LedgerError> for ErrorBody {
    fn from(err: domain::LedgerError) -> Self {
        Self::from(DomainError::Ledger(err))
    }
}
