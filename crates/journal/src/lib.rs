pub mod error;
pub mod journal;
pub mod memory;
pub mod notification;
pub mod query;

pub use error::{JournalError, Result};
pub use journal::{AppendOptions, Journal, JournalExt, NotificationStream};
pub use memory::InMemoryJournal;
pub use notification::{EnvelopeBuilder, NotificationEnvelope, NotificationId, Sequence};
pub use query::JournalQuery;
