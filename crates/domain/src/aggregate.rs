//! Core aggregate and domain event traits.

use journal::Sequence;
use serde::{Serialize, de::DeserializeOwned};

/// Trait for domain events.
///
/// Domain events are facts that have already happened. They are named in
/// past tense and are the only thing the journal records.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name, used as the journal `kind`.
    fn event_type(&self) -> &'static str;

    /// Record type the event is about ("Store", "Event", "Purchase").
    fn subject_type(&self) -> &'static str;

    /// Id of that record.
    fn subject_id(&self) -> u64;
}

/// Trait for aggregates driven by a sequenced journal.
///
/// An aggregate:
/// - decides on events from commands without mutating itself
/// - applies events to update state (pure, deterministic)
/// - tracks the journal sequence of the last event it applied
pub trait Aggregate: Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// The type of errors a rejected command produces.
    type Error: std::error::Error + Send + Sync;

    /// Sequence of the last applied event; `Sequence::initial()` when none.
    fn sequence(&self) -> Sequence;

    /// Called by the command handler after events are journaled.
    fn set_sequence(&mut self, sequence: Sequence);

    /// Applies an event to the aggregate, updating its state.
    ///
    /// Must not fail: events represent facts that have happened.
    fn apply(&mut self, event: Self::Event);

    /// Applies a committed batch.
    fn apply_events(&mut self, events: impl IntoIterator<Item = Self::Event>) {
        for event in events {
            self.apply(event);
        }
    }
}
