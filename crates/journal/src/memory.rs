use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    JournalError, JournalQuery, NotificationEnvelope, Result, Sequence,
    journal::{AppendOptions, Journal, NotificationStream, validate_for_append},
};

/// In-memory journal.
///
/// Envelopes are kept in sequence order, so sequence `n` lives at index
/// `n - 1`.
#[derive(Clone, Default)]
pub struct InMemoryJournal {
    envelopes: Arc<RwLock<Vec<NotificationEnvelope>>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of journaled notifications.
    pub async fn len(&self) -> usize {
        self.envelopes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.envelopes.read().await.is_empty()
    }
}

fn head_of(envelopes: &[NotificationEnvelope]) -> Sequence {
    envelopes
        .last()
        .map(|e| e.sequence)
        .unwrap_or(Sequence::initial())
}

#[async_trait]
impl Journal for InMemoryJournal {
    async fn append(
        &self,
        envelopes: Vec<NotificationEnvelope>,
        options: AppendOptions,
    ) -> Result<Sequence> {
        let mut store = self.envelopes.write().await;
        let head = head_of(&store);

        if let Some(expected) = options.expected_head
            && head != expected
        {
            return Err(JournalError::SequenceConflict {
                expected,
                actual: head,
            });
        }

        validate_for_append(head, &envelopes)?;

        let count = envelopes.len();
        store.extend(envelopes);
        let new_head = head_of(&store);

        metrics::counter!("journal_notifications_appended_total").increment(count as u64);
        tracing::debug!(head = %new_head, appended = count, "journal append");

        Ok(new_head)
    }

    async fn get_by_sequence(&self, sequence: Sequence) -> Result<Option<NotificationEnvelope>> {
        let store = self.envelopes.read().await;
        let found = sequence
            .as_u64()
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| store.get(index))
            .cloned();
        Ok(found)
    }

    async fn query(&self, query: JournalQuery) -> Result<Vec<NotificationEnvelope>> {
        let store = self.envelopes.read().await;
        let matching = store
            .iter()
            .filter(|e| {
                if let Some(ref subject_type) = query.subject_type
                    && &e.subject_type != subject_type
                {
                    return false;
                }
                if let Some(id) = query.subject_id
                    && e.subject_id != id
                {
                    return false;
                }
                if let Some(ref kinds) = query.kinds
                    && !kinds.contains(&e.kind)
                {
                    return false;
                }
                if let Some(from) = query.from_sequence
                    && e.sequence < from
                {
                    return false;
                }
                if let Some(to) = query.to_sequence
                    && e.sequence > to
                {
                    return false;
                }
                if let Some(from) = query.from_timestamp
                    && e.recorded_at < from
                {
                    return false;
                }
                if let Some(to) = query.to_timestamp
                    && e.recorded_at > to
                {
                    return false;
                }
                true
            })
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(matching)
    }

    async fn by_kind(&self, kind: &str) -> Result<Vec<NotificationEnvelope>> {
        let store = self.envelopes.read().await;
        Ok(store.iter().filter(|e| e.kind == kind).cloned().collect())
    }

    async fn stream_all(&self) -> Result<NotificationStream> {
        use futures_util::stream;

        let envelopes = self.envelopes.read().await.clone();
        Ok(Box::pin(stream::iter(envelopes.into_iter().map(Ok))))
    }

    async fn latest_sequence(&self) -> Result<Sequence> {
        Ok(head_of(&self.envelopes.read().await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(sequence: u64, kind: &str, subject_type: &str, subject_id: u64) -> NotificationEnvelope {
        NotificationEnvelope::builder()
            .sequence(Sequence::new(sequence))
            .kind(kind)
            .operation("test")
            .subject(subject_type, subject_id)
            .payload_raw(serde_json::json!({"test": true}))
            .try_build()
            .unwrap()
    }

    #[tokio::test]
    async fn append_single_notification() {
        let journal = InMemoryJournal::new();

        let head = journal
            .append(
                vec![envelope(1, "StoreOpened", "Store", 0)],
                AppendOptions::expect_head(Sequence::initial()),
            )
            .await
            .unwrap();

        assert_eq!(head, Sequence::first());
        assert_eq!(journal.len().await, 1);
    }

    #[tokio::test]
    async fn append_batch_returns_last_sequence() {
        let journal = InMemoryJournal::new();
        let batch = vec![
            envelope(1, "StoreOpened", "Store", 0),
            envelope(2, "EventCreated", "Event", 1),
            envelope(3, "EventSalesStarted", "Event", 1),
        ];

        let head = journal.append(batch, AppendOptions::new()).await.unwrap();
        assert_eq!(head, Sequence::new(3));
        assert_eq!(journal.latest_sequence().await.unwrap(), Sequence::new(3));
    }

    #[tokio::test]
    async fn stale_head_is_a_conflict_and_writes_nothing() {
        let journal = InMemoryJournal::new();
        journal
            .append(vec![envelope(1, "StoreOpened", "Store", 0)], AppendOptions::new())
            .await
            .unwrap();

        let result = journal
            .append(
                vec![envelope(2, "StoreSuspended", "Store", 0)],
                AppendOptions::expect_head(Sequence::initial()),
            )
            .await;

        assert!(matches!(result, Err(JournalError::SequenceConflict { .. })));
        assert_eq!(journal.len().await, 1);
    }

    #[tokio::test]
    async fn gaps_in_a_batch_are_rejected() {
        let journal = InMemoryJournal::new();
        let result = journal
            .append(
                vec![
                    envelope(1, "StoreOpened", "Store", 0),
                    envelope(3, "EventCreated", "Event", 1),
                ],
                AppendOptions::new(),
            )
            .await;

        assert!(matches!(result, Err(JournalError::InvalidAppend(_))));
        assert!(journal.is_empty().await);
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let journal = InMemoryJournal::new();
        let result = journal.append(vec![], AppendOptions::new()).await;
        assert!(matches!(result, Err(JournalError::InvalidAppend(_))));
    }

    #[tokio::test]
    async fn get_by_sequence_finds_envelope() {
        let journal = InMemoryJournal::new();
        journal
            .append(
                vec![
                    envelope(1, "StoreOpened", "Store", 0),
                    envelope(2, "EventCreated", "Event", 1),
                ],
                AppendOptions::new(),
            )
            .await
            .unwrap();

        let found = journal.get_by_sequence(Sequence::new(2)).await.unwrap();
        assert_eq!(found.map(|e| e.kind), Some("EventCreated".to_string()));
        assert!(journal.get_by_sequence(Sequence::initial()).await.unwrap().is_none());
        assert!(journal.get_by_sequence(Sequence::new(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn query_filters_by_subject_and_range() {
        let journal = InMemoryJournal::new();
        journal
            .append(
                vec![
                    envelope(1, "EventCreated", "Event", 1),
                    envelope(2, "EventCreated", "Event", 2),
                    envelope(3, "EventSalesStarted", "Event", 1),
                    envelope(4, "PurchaseCompleted", "Purchase", 1),
                ],
                AppendOptions::new(),
            )
            .await
            .unwrap();

        let event_one = journal
            .query(JournalQuery::for_subject("Event", 1))
            .await
            .unwrap();
        assert_eq!(event_one.len(), 2);

        let windowed = journal
            .query(
                JournalQuery::new()
                    .from_sequence(Sequence::new(2))
                    .to_sequence(Sequence::new(3)),
            )
            .await
            .unwrap();
        assert_eq!(windowed.len(), 2);
        assert_eq!(windowed[0].sequence, Sequence::new(2));

        let paged = journal
            .query(JournalQuery::new().offset(1).limit(2))
            .await
            .unwrap();
        assert_eq!(paged.len(), 2);
        assert_eq!(paged[0].sequence, Sequence::new(2));
    }

    #[tokio::test]
    async fn by_kind_filters() {
        let journal = InMemoryJournal::new();
        journal
            .append(
                vec![
                    envelope(1, "EventCreated", "Event", 1),
                    envelope(2, "EventCreated", "Event", 2),
                    envelope(3, "EventCancelled", "Event", 1),
                ],
                AppendOptions::new(),
            )
            .await
            .unwrap();

        assert_eq!(journal.by_kind("EventCreated").await.unwrap().len(), 2);
        assert_eq!(journal.by_kind("EventSettled").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn stream_all_yields_in_order() {
        use futures_util::StreamExt;

        let journal = InMemoryJournal::new();
        journal
            .append(
                vec![
                    envelope(1, "StoreOpened", "Store", 0),
                    envelope(2, "EventCreated", "Event", 1),
                ],
                AppendOptions::new(),
            )
            .await
            .unwrap();

        let stream = journal.stream_all().await.unwrap();
        let sequences: Vec<_> = stream
            .map(|e| e.unwrap().sequence.as_u64())
            .collect()
            .await;
        assert_eq!(sequences, vec![1, 2]);
    }
}
