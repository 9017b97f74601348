//! Command handling infrastructure.

use journal::{AppendOptions, Journal, JournalQuery, NotificationEnvelope, Sequence};

use crate::aggregate::{Aggregate, DomainEvent};
use crate::error::DomainError;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult<A: Aggregate> {
    /// The events that were generated and journaled.
    pub events: Vec<A::Event>,

    /// Journal head after the command.
    pub new_sequence: Sequence,
}

/// Single-writer command processor.
///
/// The handler owns both the journal and the live aggregate. For each
/// command it:
/// 1. Lets the command function decide on events from `&A`
/// 2. Journals them, expecting the head the aggregate last saw
/// 3. Applies them to the aggregate
///
/// A rejection in step 1 or a journal failure in step 2 leaves the
/// aggregate untouched.
pub struct CommandHandler<J, A>
where
    J: Journal,
    A: Aggregate,
{
    journal: J,
    aggregate: A,
}

impl<J, A> CommandHandler<J, A>
where
    J: Journal,
    A: Aggregate,
{
    /// Creates a handler over an aggregate that is in sync with the journal.
    pub fn new(journal: J, aggregate: A) -> Self {
        Self { journal, aggregate }
    }

    /// Rebuilds a handler by replaying every notification the journal holds
    /// after `aggregate.sequence()`.
    pub async fn restore(journal: J, mut aggregate: A) -> Result<Self, DomainError> {
        let from = aggregate.sequence().next();
        let envelopes = journal
            .query(JournalQuery::new().from_sequence(from))
            .await?;

        for envelope in envelopes {
            let event: A::Event = envelope.decode()?;
            aggregate.apply(event);
            aggregate.set_sequence(envelope.sequence);
        }

        Ok(Self { journal, aggregate })
    }

    /// Returns a reference to the underlying journal.
    pub fn journal(&self) -> &J {
        &self.journal
    }

    /// Returns the current aggregate state.
    pub fn aggregate(&self) -> &A {
        &self.aggregate
    }

    /// Executes a command and journals the resulting events.
    ///
    /// `operation` is recorded on every envelope of the batch.
    pub async fn execute<F>(
        &mut self,
        operation: &str,
        command_fn: F,
    ) -> Result<CommandResult<A>, DomainError>
    where
        F: FnOnce(&A) -> Result<Vec<A::Event>, A::Error>,
        DomainError: From<A::Error>,
    {
        let head = self.aggregate.sequence();

        let events = command_fn(&self.aggregate)?;

        if events.is_empty() {
            return Ok(CommandResult {
                events: vec![],
                new_sequence: head,
            });
        }

        let envelopes = build_envelopes(operation, head, &events)?;

        let new_sequence = self
            .journal
            .append(envelopes, AppendOptions::expect_head(head))
            .await?;

        self.aggregate.apply_events(events.iter().cloned());
        self.aggregate.set_sequence(new_sequence);

        Ok(CommandResult {
            events,
            new_sequence,
        })
    }
}

fn build_envelopes<E: DomainEvent>(
    operation: &str,
    head: Sequence,
    events: &[E],
) -> Result<Vec<NotificationEnvelope>, DomainError> {
    let mut envelopes = Vec::with_capacity(events.len());
    let mut sequence = head;

    for event in events {
        sequence = sequence.next();
        let envelope = NotificationEnvelope::builder()
            .sequence(sequence)
            .kind(event.event_type())
            .operation(operation)
            .subject(event.subject_type(), event.subject_id())
            .payload(event)?
            .try_build()
            .ok_or_else(|| {
                journal::JournalError::InvalidAppend(format!(
                    "incomplete envelope for {}",
                    event.event_type()
                ))
            })?;
        envelopes.push(envelope);
    }

    Ok(envelopes)
}
