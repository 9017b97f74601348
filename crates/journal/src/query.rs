use chrono::{DateTime, Utc};

use crate::Sequence;

/// Filter over journaled notifications.
#[derive(Debug, Clone, Default)]
pub struct JournalQuery {
    /// Filter by subject type ("Store", "Event", "Purchase").
    pub subject_type: Option<String>,

    /// Filter by subject id. Only meaningful together with `subject_type`.
    pub subject_id: Option<u64>,

    /// Filter by notification kinds (any of these).
    pub kinds: Option<Vec<String>>,

    /// Minimum sequence (inclusive).
    pub from_sequence: Option<Sequence>,

    /// Maximum sequence (inclusive).
    pub to_sequence: Option<Sequence>,

    pub from_timestamp: Option<DateTime<Utc>>,

    pub to_timestamp: Option<DateTime<Utc>>,

    pub limit: Option<usize>,

    pub offset: Option<usize>,
}

impl JournalQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for every notification about one record.
    pub fn for_subject(subject_type: impl Into<String>, subject_id: u64) -> Self {
        Self {
            subject_type: Some(subject_type.into()),
            subject_id: Some(subject_id),
            ..Default::default()
        }
    }

    pub fn for_kind(kind: impl Into<String>) -> Self {
        Self {
            kinds: Some(vec![kind.into()]),
            ..Default::default()
        }
    }

    pub fn subject_type(mut self, subject_type: impl Into<String>) -> Self {
        self.subject_type = Some(subject_type.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kinds = Some(vec![kind.into()]);
        self
    }

    pub fn kinds(mut self, kinds: Vec<String>) -> Self {
        self.kinds = Some(kinds);
        self
    }

    pub fn from_sequence(mut self, sequence: Sequence) -> Self {
        self.from_sequence = Some(sequence);
        self
    }

    pub fn to_sequence(mut self, sequence: Sequence) -> Self {
        self.to_sequence = Some(sequence);
        self
    }

    pub fn from_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.from_timestamp = Some(timestamp);
        self
    }

    pub fn to_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.to_timestamp = Some(timestamp);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_for_subject() {
        let query = JournalQuery::for_subject("Purchase", 4);
        assert_eq!(query.subject_type.as_deref(), Some("Purchase"));
        assert_eq!(query.subject_id, Some(4));
        assert!(query.kinds.is_none());
    }

    #[test]
    fn query_builder_chain() {
        let query = JournalQuery::new()
            .subject_type("Event")
            .kind("EventSettled")
            .from_sequence(Sequence::new(2))
            .to_sequence(Sequence::new(9))
            .limit(10)
            .offset(1);

        assert_eq!(query.kinds, Some(vec!["EventSettled".to_string()]));
        assert_eq!(query.from_sequence, Some(Sequence::new(2)));
        assert_eq!(query.to_sequence, Some(Sequence::new(9)));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, Some(1));
    }
}
