use era_gateway::{
    execute_batch, lookup, resolve_operation, Gateway, GatewayError, OperationInput, Outcome,
    Resource,
};
use era_rpc::{Credentials, TransportConfig};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDRESS: &str = "0x1234567890123456789012345678901234567890";

fn gateway_for(server: &MockServer) -> Gateway<era_rpc::HttpTransport> {
    Gateway::connect(
        Credentials::new(server.uri()).with_api_key("era-key"),
        &TransportConfig::from_millis(5_000),
    )
    .unwrap()
}

#[tokio::test]
async fn test_balance_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer era-key"))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": "eth_getBalance",
            "params": [ADDRESS, "0x64"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": "0x1bc16d674ec80000"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let spec = lookup(Resource::Accounts, "getBalance").unwrap();
    let input = OperationInput::new().with("address", ADDRESS).with("blockNumber", "100");

    let result = gateway.execute(spec, &input).await.unwrap();

    assert_eq!(
        result,
        json!({
            "address": ADDRESS,
            "blockNumber": "0x64",
            "balance": "0x1bc16d674ec80000",
            "balanceWei": "2000000000000000000",
            "balanceEth": "2"
        })
    );
}

#[tokio::test]
async fn test_upstream_error_in_tolerant_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "zks_getAllAccountBalances"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32602, "message": "Invalid params"}
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let spec = resolve_operation("tokens", "getAllAccountBalances").unwrap();
    let items = vec![
        OperationInput::new().with("address", ADDRESS),
        OperationInput::new(),
    ];

    let records = execute_batch(&gateway, spec, &items, true, &CancellationToken::new())
        .await
        .unwrap();

    let errors: Vec<String> = records
        .iter()
        .map(|record| match &record.json {
            Outcome::Failure { error } => error.clone(),
            Outcome::Success(value) => panic!("unexpected success {}", value),
        })
        .collect();
    assert!(errors[0].contains("Invalid params"));
    assert_eq!(errors[1], "Missing required parameter: address");
    // The item with no address never reached the server
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_transaction_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": null
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let spec = lookup(Resource::Transactions, "getTransactionByHash").unwrap();
    let input = OperationInput::new().with(
        "transactionHash",
        "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
    );

    assert_eq!(gateway.execute(spec, &input).await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_gateway_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let spec = lookup(Resource::Network, "getChainId").unwrap();

    match gateway.execute(spec, &OperationInput::new()).await {
        Err(GatewayError::Rpc(error)) => assert!(error.to_string().contains("HTTP 502")),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[test]
fn test_unsupported_pair() {
    assert!(matches!(
        resolve_operation("network", "getPeers"),
        Err(GatewayError::UnsupportedOperation { .. })
    ));
    assert!(matches!(
        resolve_operation("wallets", "getBalance"),
        Err(GatewayError::UnsupportedResource(_))
    ));
}
