use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a journaled notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random notification ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a notification in the journal.
///
/// The journal is a single global stream: the first notification is at
/// sequence 1 and every committed notification takes the next number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Sequence(u64);

impl Sequence {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The head of an empty journal.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Sequence of the first notification.
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Sequence {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A notification together with its journal metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    pub notification_id: NotificationId,

    /// Position in the journal.
    pub sequence: Sequence,

    /// Notification kind (e.g. "EventCreated", "PurchaseRefunded").
    pub kind: String,

    /// Name of the operation that produced it (e.g. "purchaseTickets").
    pub operation: String,

    /// Record type the notification is about ("Store", "Event", "Purchase").
    pub subject_type: String,

    /// Id of that record; 0 for the store singleton.
    pub subject_id: u64,

    pub recorded_at: DateTime<Utc>,

    /// The notification body as JSON.
    pub payload: serde_json::Value,

    pub metadata: HashMap<String, serde_json::Value>,
}

impl NotificationEnvelope {
    pub fn builder() -> EnvelopeBuilder {
        EnvelopeBuilder::default()
    }

    /// Deserializes the payload into a concrete notification type.
    pub fn decode<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// Builder for notification envelopes.
#[derive(Debug, Default)]
pub struct EnvelopeBuilder {
    notification_id: Option<NotificationId>,
    sequence: Option<Sequence>,
    kind: Option<String>,
    operation: Option<String>,
    subject_type: Option<String>,
    subject_id: u64,
    recorded_at: Option<DateTime<Utc>>,
    payload: Option<serde_json::Value>,
    metadata: HashMap<String, serde_json::Value>,
}

impl EnvelopeBuilder {
    /// Sets the notification ID. If not set, a new ID will be generated.
    pub fn notification_id(mut self, id: NotificationId) -> Self {
        self.notification_id = Some(id);
        self
    }

    pub fn sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn subject(mut self, subject_type: impl Into<String>, subject_id: u64) -> Self {
        self.subject_type = Some(subject_type.into());
        self.subject_id = subject_id;
        self
    }

    /// Sets the timestamp. If not set, the current time will be used.
    pub fn recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Sets the payload from a serializable value.
    pub fn payload<T: Serialize>(mut self, payload: &T) -> Result<Self, serde_json::Error> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    pub fn payload_raw(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Builds the envelope, returning None if sequence, kind, operation,
    /// subject or payload is missing.
    pub fn try_build(self) -> Option<NotificationEnvelope> {
        Some(NotificationEnvelope {
            notification_id: self.notification_id.unwrap_or_default(),
            sequence: self.sequence?,
            kind: self.kind?,
            operation: self.operation?,
            subject_type: self.subject_type?,
            subject_id: self.subject_id,
            recorded_at: self.recorded_at.unwrap_or_else(Utc::now),
            payload: self.payload?,
            metadata: self.metadata,
        })
    }
}
