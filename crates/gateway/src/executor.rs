// gateway/src/executor.rs

//! Per-item batch execution
//!
//! Items run strictly one after another, in input order. Each produces one
//! record tagged with its input index.

use crate::catalog::OperationSpec;
use crate::params::OperationInput;
use crate::router::Gateway;
use crate::GatewayError;
use era_rpc::Transport;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Result payload of one item: the shaped result, or the failure message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Success(Value),
    Failure { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairedItem {
    pub item: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub json: Outcome,
    pub paired_item: PairedItem,
}

impl ExecutionRecord {
    pub fn success(item: usize, value: Value) -> Self {
        Self {
            json: Outcome::Success(value),
            paired_item: PairedItem { item },
        }
    }

    pub fn failure(item: usize, error: impl Into<String>) -> Self {
        Self {
            json: Outcome::Failure { error: error.into() },
            paired_item: PairedItem { item },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.json, Outcome::Failure { .. })
    }
}

/// The batch stopped at `item`
#[derive(Debug, thiserror::Error)]
#[error("Item {item} failed: {source}")]
pub struct BatchError {
    pub item: usize,
    pub source: GatewayError,
}

/// Run `spec` once per item.
///
/// With `continue_on_failure` an item's failure becomes a `{error}` record
/// and the batch moves on; without it the first failure aborts the batch and
/// no records are returned. Cancellation always aborts, including a call
/// already in flight.
pub async fn execute_batch<T: Transport>(
    gateway: &Gateway<T>,
    spec: &OperationSpec,
    items: &[OperationInput],
    continue_on_failure: bool,
    cancel: &CancellationToken,
) -> Result<Vec<ExecutionRecord>, BatchError> {
    let mut records = Vec::with_capacity(items.len());
    let mut failed = 0usize;

    for (index, item) in items.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(BatchError {
                item: index,
                source: GatewayError::Cancelled,
            });
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GatewayError::Cancelled),
            result = gateway.execute(spec, item) => result,
        };

        match outcome {
            Ok(value) => records.push(ExecutionRecord::success(index, value)),
            Err(error) if continue_on_failure && !error.is_fatal() => {
                tracing::warn!(
                    item = index,
                    operation = spec.operation,
                    error = %error,
                    "Item failed, continuing"
                );
                failed += 1;
                records.push(ExecutionRecord::failure(index, error.to_string()));
            }
            Err(error) => {
                tracing::debug!(item = index, error = %error, "Aborting batch");
                return Err(BatchError {
                    item: index,
                    source: error,
                });
            }
        }
    }

    tracing::info!(
        resource = %spec.resource,
        operation = spec.operation,
        items = items.len(),
        failed,
        "Batch complete"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{lookup, Resource};
    use crate::mock::MockTransport;
    use era_rpc::{RpcErrorObject, RpcResponse};
    use proptest::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    const ADDRESSES: [&str; 3] = [
        "0x1111111111111111111111111111111111111111",
        "0x2222222222222222222222222222222222222222",
        "0x3333333333333333333333333333333333333333",
    ];

    fn balance_items(count: usize) -> Vec<OperationInput> {
        (0..count)
            .map(|i| OperationInput::new().with("address", format!("0x{:040x}", i + 1)))
            .collect()
    }

    /// Fails the request whose address parameter is `failing`
    fn failing_on(failing: String) -> MockTransport {
        MockTransport::new(move |request| {
            if request.params.first() == Some(&json!(failing)) {
                Ok(RpcResponse::failure(
                    request.id,
                    RpcErrorObject {
                        code: -32000,
                        message: "header not found".into(),
                        data: None,
                    },
                ))
            } else {
                Ok(RpcResponse::success(request.id, json!("0x1")))
            }
        })
    }

    fn run<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_record_serialization() {
        let record = ExecutionRecord::success(2, json!({"balance": "0x1"}));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"json": {"balance": "0x1"}, "pairedItem": {"item": 2}})
        );

        let record = ExecutionRecord::failure(0, "boom");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"json": {"error": "boom"}, "pairedItem": {"item": 0}})
        );
    }

    #[tokio::test]
    async fn test_records_in_input_order() {
        let gateway = Gateway::new(MockTransport::replying(json!("0x1")));
        let spec = lookup(Resource::Accounts, "getBalance").unwrap();
        let items: Vec<OperationInput> = ADDRESSES
            .iter()
            .map(|address| OperationInput::new().with("address", *address))
            .collect();

        let records = execute_batch(&gateway, spec, &items, false, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        for (index, record) in records.iter().enumerate() {
            assert_eq!(record.paired_item.item, index);
            match &record.json {
                Outcome::Success(value) => assert_eq!(value["address"], json!(ADDRESSES[index])),
                other => panic!("expected success, got {:?}", other),
            }
        }
        let sent: Vec<_> = gateway
            .transport()
            .requests()
            .iter()
            .map(|r| r.params[0].clone())
            .collect();
        assert_eq!(sent, ADDRESSES.iter().map(|a| json!(a)).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_failure_recorded_when_tolerated() {
        let gateway = Gateway::new(MockTransport::replying(json!("0x1")));
        let spec = lookup(Resource::Accounts, "getBalance").unwrap();
        let items = vec![
            OperationInput::new().with("address", ADDRESSES[0]),
            OperationInput::new().with("address", "not-an-address"),
            OperationInput::new().with("address", ADDRESSES[2]),
        ];

        let records = execute_batch(&gateway, spec, &items, true, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        assert!(!records[0].is_failure());
        assert!(!records[2].is_failure());
        match &records[1].json {
            Outcome::Failure { error } => {
                assert!(error.starts_with("Invalid address format: not-an-address"))
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(records[1].paired_item.item, 1);
    }

    #[tokio::test]
    async fn test_failure_aborts_when_not_tolerated() {
        let gateway = Gateway::new(failing_on(ADDRESSES[1].to_string()));
        let spec = lookup(Resource::Accounts, "getBalance").unwrap();
        let items: Vec<OperationInput> = ADDRESSES
            .iter()
            .map(|address| OperationInput::new().with("address", *address))
            .collect();

        let error = execute_batch(&gateway, spec, &items, false, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(error.item, 1);
        assert!(matches!(error.source, GatewayError::Rpc(_)));
        assert!(error.to_string().contains("header not found"));
        // Item 2 is never attempted
        assert_eq!(gateway.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let gateway = Gateway::new(MockTransport::replying(json!("0x1")));
        let spec = lookup(Resource::Accounts, "getBalance").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = execute_batch(&gateway, spec, &balance_items(2), true, &cancel)
            .await
            .unwrap_err();

        assert_eq!(error.item, 0);
        assert!(matches!(error.source, GatewayError::Cancelled));
        assert!(gateway.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_call() {
        let transport = MockTransport::replying(json!("0x1")).with_delay(Duration::from_secs(30));
        let gateway = Gateway::new(transport);
        let spec = lookup(Resource::Accounts, "getBalance").unwrap();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let error = execute_batch(&gateway, spec, &balance_items(3), true, &cancel)
            .await
            .unwrap_err();

        assert_eq!(error.item, 0);
        assert!(matches!(error.source, GatewayError::Cancelled));
        assert_eq!(gateway.transport().requests().len(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_batch_semantics(
            count in 1usize..8,
            failing in 0usize..8,
            tolerate in any::<bool>(),
        ) {
            let failing = failing % count;
            let failing_address = format!("0x{:040x}", failing + 1);
            let gateway = Gateway::new(failing_on(failing_address));
            let spec = lookup(Resource::Accounts, "getBalance").unwrap();
            let items = balance_items(count);

            let cancel = CancellationToken::new();
            let result = run(execute_batch(&gateway, spec, &items, tolerate, &cancel));

            if tolerate {
                let records = result.unwrap();
                prop_assert_eq!(records.len(), count);
                for (index, record) in records.iter().enumerate() {
                    prop_assert_eq!(record.paired_item.item, index);
                    prop_assert_eq!(record.is_failure(), index == failing);
                }
            } else {
                let error = result.unwrap_err();
                prop_assert_eq!(error.item, failing);
                prop_assert_eq!(gateway.transport().requests().len(), failing + 1);
            }
        }
    }
}
