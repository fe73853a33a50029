// rpc/src/resolve.rs
use crate::{RpcError, RpcResponse, RpcResult};
use serde_json::Value;

/// Extract the `result` of a response, or turn its `error` into a typed failure.
///
/// `error` wins when both are present. A response carrying neither is
/// reported as a protocol error with code 0.
pub fn resolve(response: RpcResponse) -> RpcResult<Value> {
    if let Some(error) = response.error {
        return Err(error.into());
    }

    response.result.ok_or_else(|| RpcError::Protocol {
        code: 0,
        message: "malformed response".to_string(),
        data: None,
    })
}
