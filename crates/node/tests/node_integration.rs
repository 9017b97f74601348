//! Integration tests for the JSON Lines node.

use common::{AccountId, Amount};
use domain::{Genesis, LedgerService};
use journal::InMemoryJournal;
use node::config::Config;
use node::error::NodeError;
use serde_json::{Value, json};

fn genesis() -> Genesis {
    Genesis::new(AccountId::person("0xowner"), "Bileto")
        .allocate(AccountId::person("0xcustomer"), Amount::new(10_000))
}

fn setup() -> LedgerService<InMemoryJournal> {
    LedgerService::new(InMemoryJournal::new(), genesis()).unwrap()
}

fn command(caller: &str, value: u128, command: Value) -> Value {
    json!({
        "type": "command",
        "caller": {"address": caller},
        "value": value.to_string(),
        "command": command,
    })
}

fn query(query: Value) -> Value {
    json!({"type": "query", "query": query})
}

/// Feeds `requests` through the node and returns the decoded responses.
async fn exchange(service: &LedgerService<InMemoryJournal>, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();
    let mut output = Vec::new();

    let handled = node::serve(service, input.as_bytes(), &mut output)
        .await
        .unwrap();
    assert_eq!(handled, requests.len());

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

async fn one(service: &LedgerService<InMemoryJournal>, request: Value) -> Value {
    exchange(service, &[request]).await.remove(0)
}

fn setup_requests() -> Vec<Value> {
    vec![
        command("0xowner", 0, json!({"op": "open_store"})),
        command(
            "0xowner",
            0,
            json!({
                "op": "create_event",
                "external_id": "concert-2024",
                "organizer": {"address": "0xorganizer"},
                "name": "Concert",
                "incentive_bps": 1000,
                "ticket_price": "500",
                "tickets_on_sale": 4,
            }),
        ),
        command("0xorganizer", 0, json!({"op": "start_ticket_sales", "event_id": 1})),
    ]
}

fn purchase(quantity: u32, value: u128) -> Value {
    command(
        "0xcustomer",
        value,
        json!({
            "op": "purchase_tickets",
            "event_id": 1,
            "quantity": quantity,
            "external_id": "order-1",
            "timestamp": 1_700_000_000u64,
            "customer_id": "customer-42",
        }),
    )
}

#[tokio::test]
async fn test_health_check() {
    let service = setup();
    let response = one(&service, query(json!({"name": "health"}))).await;

    assert_eq!(response["status"], "ok");
    assert_eq!(response["result"]["status"], "ok");
    assert_eq!(response["result"]["sequence"], 0);
}

#[tokio::test]
async fn test_full_purchase_flow() {
    let service = setup();
    let mut requests = setup_requests();
    requests.push(purchase(2, 1_000));
    requests.push(query(json!({"name": "event_sales_info", "event_id": 1})));

    let responses = exchange(&service, &requests).await;

    for response in &responses {
        assert_eq!(response["status"], "ok", "{response}");
    }
    assert_eq!(responses[1]["result"]["event_id"], 1);
    assert_eq!(
        responses[1]["result"]["notifications"][0]["type"],
        "EventCreated"
    );
    assert_eq!(responses[3]["result"]["purchase_id"], 1);
    assert_eq!(responses[3]["result"]["sequence"], 4);

    let sales = &responses[4]["result"];
    assert_eq!(sales["tickets_sold"], 2);
    assert_eq!(sales["tickets_left"], 2);
    assert_eq!(sales["balance"], "1000");
}

#[tokio::test]
async fn test_rejection_carries_code_and_kind() {
    let service = setup();
    exchange(&service, &setup_requests()).await;

    let response = one(&service, purchase(1, 499)).await;
    assert_eq!(response["status"], "error");
    assert_eq!(response["error"]["code"], "E030");
    assert_eq!(response["error"]["kind"], "monetary_mismatch");

    let response = one(&service, command("0xstranger", 0, json!({"op": "close_store"}))).await;
    assert_eq!(response["error"]["code"], "E001");
    assert_eq!(response["error"]["kind"], "authorization");

    let response = one(&service, command("0xowner", 5, json!({"op": "suspend_store"}))).await;
    assert_eq!(response["error"]["code"], "E039");
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let service = setup();
    let response = one(&service, query(json!({"name": "purchase_info", "purchase_id": 9}))).await;

    assert_eq!(response["status"], "error");
    assert_eq!(response["error"]["code"], "E003");
    assert_eq!(response["error"]["kind"], "not_found");
}

#[tokio::test]
async fn test_malformed_lines_do_not_stop_the_node() {
    let service = setup();
    let input = "not json\n\n{\"type\":\"query\",\"query\":{\"name\":\"store_info\"}}\n";
    let mut output = Vec::new();

    let handled = node::serve(&service, input.as_bytes(), &mut output)
        .await
        .unwrap();
    assert_eq!(handled, 2);

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses[0]["error"]["code"], "INVALID_REQUEST");
    assert_eq!(responses[1]["result"]["status"], "Created");
    assert_eq!(responses[1]["result"]["name"], "Bileto");
}

#[tokio::test]
async fn test_account_queries() {
    let service = setup();
    let mut requests = setup_requests();
    requests.push(purchase(1, 500));
    exchange(&service, &requests).await;

    let customer = json!({"address": "0xcustomer"});
    let responses = exchange(
        &service,
        &[
            query(json!({"name": "account_balance", "account": customer})),
            query(json!({"name": "account_roles", "account": customer})),
            query(json!({"name": "customer_purchases", "account": customer})),
            query(json!({"name": "organizer_events", "account": {"address": "0xorganizer"}})),
        ],
    )
    .await;

    assert_eq!(responses[0]["result"], "9500");
    assert_eq!(responses[1]["result"]["is_customer"], true);
    assert_eq!(responses[1]["result"]["is_owner"], false);
    assert_eq!(responses[2]["result"], json!([1]));
    assert_eq!(responses[3]["result"], json!([1]));
}

#[tokio::test]
async fn test_notifications_query_hides_credentials() {
    let service = setup();
    let mut requests = setup_requests();
    requests.push(purchase(1, 500));
    exchange(&service, &requests).await;

    let response = one(
        &service,
        query(json!({"name": "notifications", "subject_type": "Purchase"})),
    )
    .await;

    let envelopes = response["result"].as_array().unwrap();
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0]["kind"], "PurchaseCompleted");
    assert_eq!(envelopes[0]["operation"], "purchaseTickets");

    let text = response.to_string();
    assert!(!text.contains("order-1"));
    assert!(!text.contains("customer-42"));
}

#[test]
fn test_genesis_defaults_from_config() {
    let config = Config {
        owner: "0xboss".to_string(),
        store_name: "Night Market".to_string(),
        ..Config::default()
    };
    let genesis = node::load_genesis(&config).unwrap();

    assert_eq!(genesis.owner, AccountId::person("0xboss"));
    assert_eq!(genesis.store_name, "Night Market");
    assert!(genesis.allocations.is_empty());
}

#[test]
fn test_genesis_file_is_loaded() {
    let path = std::env::temp_dir().join(format!("ledger-genesis-{}.json", std::process::id()));
    std::fs::write(
        &path,
        json!({
            "owner": {"address": "0xowner"},
            "store_name": "Bileto",
            "allocations": [{"account": {"address": "0xcustomer"}, "balance": "750"}],
        })
        .to_string(),
    )
    .unwrap();

    let config = Config {
        genesis_path: Some(path.clone()),
        ..Config::default()
    };
    let genesis = node::load_genesis(&config).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(genesis, genesis_with_750());
}

fn genesis_with_750() -> Genesis {
    Genesis::new(AccountId::person("0xowner"), "Bileto")
        .allocate(AccountId::person("0xcustomer"), Amount::new(750))
}

#[test]
fn test_missing_genesis_file_is_reported() {
    let config = Config {
        genesis_path: Some("/nonexistent/genesis.json".into()),
        ..Config::default()
    };
    assert!(matches!(
        node::load_genesis(&config),
        Err(NodeError::GenesisRead { .. })
    ));
}

#[test]
fn test_overflowing_genesis_is_rejected() {
    let path = std::env::temp_dir().join(format!("ledger-overflow-{}.json", std::process::id()));
    std::fs::write(
        &path,
        json!({
            "owner": {"address": "0xowner"},
            "store_name": "Bileto",
            "allocations": [
                {"account": {"address": "0xa"}, "balance": u128::MAX.to_string()},
                {"account": {"address": "0xb"}, "balance": "1"},
            ],
        })
        .to_string(),
    )
    .unwrap();

    let config = Config {
        genesis_path: Some(path.clone()),
        ..Config::default()
    };
    let result = node::load_genesis(&config);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(NodeError::Genesis(_))));
}
