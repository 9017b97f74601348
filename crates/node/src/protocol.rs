//! Request and response types of the JSON Lines protocol.

use common::{AccountId, Amount, EventId, PurchaseId};
use domain::{CommandResult, Ledger, LedgerCommand, Notification};
use journal::{JournalQuery, Sequence};
use serde::{Deserialize, Serialize};

use crate::error::ErrorBody;

// -- Request types --

/// One input line.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// A mutating operation on behalf of `caller`, with `value` attached.
    Command {
        caller: AccountId,
        #[serde(default)]
        value: Amount,
        command: LedgerCommand,
    },
    Query { query: LedgerQuery },
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Command { .. } => "command",
            Request::Query { .. } => "query",
        }
    }
}

/// Read-only requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum LedgerQuery {
    Health,
    StoreInfo,
    EventInfo { event_id: EventId },
    EventSalesInfo { event_id: EventId },
    PurchaseInfo { purchase_id: PurchaseId },
    AccountRoles { account: AccountId },
    OrganizerEvents { account: AccountId },
    CustomerPurchases { account: AccountId },
    AccountBalance { account: AccountId },
    Notifications(NotificationFilter),
}

/// Journal filter accepted over the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationFilter {
    #[serde(default)]
    pub subject_type: Option<String>,
    #[serde(default)]
    pub subject_id: Option<u64>,
    #[serde(default)]
    pub kinds: Option<Vec<String>>,
    #[serde(default)]
    pub from_sequence: Option<Sequence>,
    #[serde(default)]
    pub to_sequence: Option<Sequence>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

impl From<NotificationFilter> for JournalQuery {
    fn from(filter: NotificationFilter) -> Self {
        JournalQuery {
            subject_type: filter.subject_type,
            subject_id: filter.subject_id,
            kinds: filter.kinds,
            from_sequence: filter.from_sequence,
            to_sequence: filter.to_sequence,
            limit: filter.limit,
            offset: filter.offset,
            ..Default::default()
        }
    }
}

// -- Response types --

/// One output line.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok { result: serde_json::Value },
    Error { error: ErrorBody },
}

impl Response {
    pub fn ok<T: Serialize>(result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(result) => Response::Ok { result },
            Err(e) => Response::Error {
                error: ErrorBody::internal(e.to_string()),
            },
        }
    }

    pub fn error(error: impl Into<ErrorBody>) -> Self {
        Response::Error {
            error: error.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }
}

/// Result of a committed command.
#[derive(Debug, Serialize)]
pub struct CommandOutcome {
    pub sequence: Sequence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_id: Option<PurchaseId>,
    pub notifications: Vec<Notification>,
}

impl From<CommandResult<Ledger>> for CommandOutcome {
    fn from(result: CommandResult<Ledger>) -> Self {
        Self {
            sequence: result.new_sequence,
            event_id: result.created_event_id(),
            purchase_id: result.created_purchase_id(),
            notifications: result.events,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sequence: Sequence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_request() {
        let request: Request = serde_json::from_str(
            r#"{
                "type": "command",
                "caller": {"address": "0xcustomer"},
                "value": "3000",
                "command": {
                    "op": "purchase_tickets",
                    "event_id": 1,
                    "quantity": 3,
                    "external_id": "order-1",
                    "timestamp": 1700000000,
                    "customer_id": "customer-42"
                }
            }"#,
        )
        .unwrap();

        match request {
            Request::Command {
                caller,
                value,
                command,
            } => {
                assert_eq!(caller, AccountId::person("0xcustomer"));
                assert_eq!(value, Amount::new(3_000));
                assert_eq!(command.name(), "purchaseTickets");
            }
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn value_defaults_to_zero() {
        let request: Request = serde_json::from_str(
            r#"{"type":"command","caller":{"address":"0xowner"},"command":{"op":"open_store"}}"#,
        )
        .unwrap();
        assert!(matches!(request, Request::Command { value, .. } if value == Amount::ZERO));
    }

    #[test]
    fn parses_queries() {
        let request: Request =
            serde_json::from_str(r#"{"type":"query","query":{"name":"event_info","event_id":2}}"#)
                .unwrap();
        assert!(matches!(
            request,
            Request::Query {
                query: LedgerQuery::EventInfo { event_id }
            } if event_id == EventId::new(2)
        ));

        let request: Request = serde_json::from_str(
            r#"{"type":"query","query":{"name":"notifications","subject_type":"Event","limit":5}}"#,
        )
        .unwrap();
        match request {
            Request::Query {
                query: LedgerQuery::Notifications(filter),
            } => {
                let query = JournalQuery::from(filter);
                assert_eq!(query.subject_type.as_deref(), Some("Event"));
                assert_eq!(query.limit, Some(5));
            }
            other => panic!("expected notifications query, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_operation() {
        let result: Result<Request, _> = serde_json::from_str(
            r#"{"type":"command","caller":{"address":"0xowner"},"command":{"op":"mint"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn response_shapes() {
        let ok = serde_json::to_value(Response::ok(&serde_json::json!({"x": 1}))).unwrap();
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["result"]["x"], 1);

        let err = serde_json::to_value(Response::error(ErrorBody::invalid_request("bad"))).unwrap();
        assert_eq!(err["status"], "error");
        assert_eq!(err["error"]["code"], "INVALID_REQUEST");
    }
}
