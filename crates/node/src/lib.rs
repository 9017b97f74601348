//! JSON Lines host for the ticket ledger.
//!
//! Reads one `Request` per input line, runs it against a `LedgerService`
//! and writes one `Response` per output line, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod protocol;

use common::AccountId;
use domain::{Aggregate, CallContext, DomainError, Genesis, LedgerService};
use journal::Journal;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use config::Config;
use error::{ErrorBody, NodeError};
use protocol::{CommandOutcome, HealthResponse, LedgerQuery, Request, Response};

/// Builds the genesis document from the file named in `config`, or from
/// the configured owner and store name when no file is given. Allocations
/// must sum to a representable supply.
pub fn load_genesis(config: &Config) -> Result<Genesis, NodeError> {
    let Some(path) = &config.genesis_path else {
        return Ok(Genesis::new(
            AccountId::person(config.owner.as_str()),
            config.store_name.as_str(),
        ));
    };

    let raw = std::fs::read_to_string(path).map_err(|source| NodeError::GenesisRead {
        path: path.clone(),
        source,
    })?;
    let genesis: Genesis =
        serde_json::from_str(&raw).map_err(|source| NodeError::GenesisFormat {
            path: path.clone(),
            source,
        })?;
    genesis.supply().map_err(DomainError::from)?;
    Ok(genesis)
}

/// Runs one request.
#[tracing::instrument(skip(service, request), fields(request = request.kind()))]
pub async fn dispatch<J: Journal>(service: &LedgerService<J>, request: Request) -> Response {
    metrics::counter!("node_requests_total", "type" => request.kind()).increment(1);

    match request {
        Request::Command {
            caller,
            value,
            command,
        } => {
            let ctx = CallContext::new(caller).with_value(value);
            match service.execute(ctx, command).await {
                Ok(result) => Response::ok(&CommandOutcome::from(result)),
                Err(e) => Response::error(e),
            }
        }
        Request::Query { query } => run_query(service, query).await,
    }
}

async fn run_query<J: Journal>(service: &LedgerService<J>, query: LedgerQuery) -> Response {
    match query {
        LedgerQuery::Health => {
            let sequence = service.read(|ledger| ledger.sequence()).await;
            Response::ok(&HealthResponse {
                status: "ok",
                sequence,
            })
        }
        LedgerQuery::StoreInfo => Response::ok(&service.store_info().await),
        LedgerQuery::EventInfo { event_id } => respond(service.event_info(event_id).await),
        LedgerQuery::EventSalesInfo { event_id } => {
            respond(service.event_sales_info(event_id).await)
        }
        LedgerQuery::PurchaseInfo { purchase_id } => {
            respond(service.purchase_info(purchase_id).await)
        }
        LedgerQuery::AccountRoles { account } => {
            Response::ok(&service.account_roles(&account).await)
        }
        LedgerQuery::OrganizerEvents { account } => {
            Response::ok(&service.organizer_events(&account).await)
        }
        LedgerQuery::CustomerPurchases { account } => {
            Response::ok(&service.customer_purchases(&account).await)
        }
        LedgerQuery::AccountBalance { account } => {
            Response::ok(&service.account_balance(&account).await)
        }
        LedgerQuery::Notifications(filter) => respond(service.notifications(filter.into()).await),
    }
}

fn respond<T, E>(result: Result<T, E>) -> Response
where
    T: serde::Serialize,
    E: Into<DomainError>,
{
    match result {
        Ok(value) => Response::ok(&value),
        Err(e) => {
            let err: DomainError = e.into();
            Response::error(err)
        }
    }
}

/// Parses and runs one input line.
pub async fn handle_line<J: Journal>(service: &LedgerService<J>, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(service, request).await,
        Err(e) => {
            tracing::warn!(error = %e, "malformed request");
            Response::error(ErrorBody::invalid_request(e.to_string()))
        }
    }
}

/// Serves requests from `reader` until end of input, writing responses to
/// `writer`. Blank lines are skipped. Returns the number of requests handled.
pub async fn serve<J, R, W>(
    service: &LedgerService<J>,
    reader: R,
    writer: &mut W,
) -> Result<usize, NodeError>
where
    J: Journal,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = handle_line(service, line).await;
        tracing::debug!(ok = response.is_ok(), "request handled");
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}
