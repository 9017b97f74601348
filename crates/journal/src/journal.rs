use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::{JournalError, JournalQuery, NotificationEnvelope, Result, Sequence};

/// Options for appending notifications.
#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Head the writer expects the journal to be at. If None, no check is
    /// performed.
    pub expected_head: Option<Sequence>,
}

impl AppendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_head(sequence: Sequence) -> Self {
        Self {
            expected_head: Some(sequence),
        }
    }
}

pub type NotificationStream = Pin<Box<dyn Stream<Item = Result<NotificationEnvelope>> + Send>>;

/// Append-only, globally sequenced store of ledger notifications.
///
/// Implementations must be thread-safe.
#[async_trait]
pub trait Journal: Send + Sync {
    /// Appends a batch atomically: either every envelope is stored or none.
    ///
    /// Fails with `SequenceConflict` when `options.expected_head` does not
    /// match the current head. Returns the new head.
    async fn append(
        &self,
        envelopes: Vec<NotificationEnvelope>,
        options: AppendOptions,
    ) -> Result<Sequence>;

    async fn get_by_sequence(&self, sequence: Sequence) -> Result<Option<NotificationEnvelope>>;

    /// Notifications matching a query, in sequence order.
    async fn query(&self, query: JournalQuery) -> Result<Vec<NotificationEnvelope>>;

    async fn by_kind(&self, kind: &str) -> Result<Vec<NotificationEnvelope>>;

    /// Streams every notification in sequence order.
    async fn stream_all(&self) -> Result<NotificationStream>;

    /// Current head; `Sequence::initial()` for an empty journal.
    async fn latest_sequence(&self) -> Result<Sequence>;
}

#[async_trait]
pub trait JournalExt: Journal {
    async fn append_one(
        &self,
        envelope: NotificationEnvelope,
        options: AppendOptions,
    ) -> Result<Sequence> {
        self.append(vec![envelope], options).await
    }

    /// Every notification about one record.
    async fn for_subject(
        &self,
        subject_type: &str,
        subject_id: u64,
    ) -> Result<Vec<NotificationEnvelope>> {
        self.query(JournalQuery::for_subject(subject_type, subject_id))
            .await
    }
}

impl<T: Journal + ?Sized> JournalExt for T {}

/// Checks that a batch is non-empty and numbered contiguously from
/// `head + 1`.
pub fn validate_for_append(head: Sequence, envelopes: &[NotificationEnvelope]) -> Result<()> {
    let Some(first) = envelopes.first() else {
        return Err(JournalError::InvalidAppend(
            "cannot append an empty batch".to_string(),
        ));
    };

    if first.sequence != head.next() {
        return Err(JournalError::InvalidAppend(format!(
            "batch must start at sequence {}, got {}",
            head.next(),
            first.sequence
        )));
    }

    let mut expected = first.sequence;
    for envelope in envelopes.iter().skip(1) {
        expected = expected.next();
        if envelope.sequence != expected {
            return Err(JournalError::InvalidAppend(format!(
                "sequences must be contiguous: expected {}, got {}",
                expected, envelope.sequence
            )));
        }
    }

    Ok(())
}
