// gateway/src/shape.rs

use crate::catalog::Shape;
use crate::{GatewayError, GatewayResult};
use era_primitives::{parse_quantity, Wei};
use serde_json::{json, Value};

/// Turn a resolved result into the record emitted for `shape`.
///
/// `params` are the positional parameters that were sent; account shapes
/// echo the address and block number from them.
pub fn apply(shape: Shape, method: &str, params: &[Value], result: Value) -> GatewayResult<Value> {
    let unexpected = |reason: String| GatewayError::UnexpectedResult {
        method: method.to_string(),
        reason,
    };
    let address = || params.first().cloned().unwrap_or(Value::Null);
    let block_number = || params.get(1).cloned().unwrap_or(Value::Null);

    let shaped = match shape {
        Shape::Identity => result,
        Shape::Balance => {
            let raw = result
                .as_str()
                .ok_or_else(|| unexpected(format!("expected a hex balance, got {}", result)))?;
            let wei = Wei::from_hex(raw).map_err(|e| unexpected(e.to_string()))?;
            json!({
                "address": address(),
                "blockNumber": block_number(),
                "balance": raw,
                "balanceWei": wei.to_string(),
                "balanceEth": wei.to_ether_string(),
            })
        }
        Shape::AccountDetails => json!({
            "address": address(),
            "blockNumber": block_number(),
            "accountDetails": result,
        }),
        Shape::Nonce => {
            let nonce = hex_value(&result).map_err(unexpected)?;
            json!({
                "address": address(),
                "blockNumber": block_number(),
                "nonce": result,
                "nonceDecimal": nonce.to_string(),
            })
        }
        Shape::AllBalances => {
            let token_count = match &result {
                Value::Null => 0,
                Value::Object(balances) => balances.len(),
                other => return Err(unexpected(format!("expected a balance map, got {}", other))),
            };
            json!({
                "address": address(),
                "balances": result,
                "tokenCount": token_count,
            })
        }
        Shape::Quantity => {
            let value = hex_value(&result).map_err(unexpected)?;
            json!({
                "value": result,
                "decimal": value.to_string(),
            })
        }
    };
    Ok(shaped)
}

fn hex_value(result: &Value) -> Result<num_bigint::BigUint, String> {
    let raw = result
        .as_str()
        .ok_or_else(|| format!("expected a hex quantity, got {}", result))?;
    parse_quantity(raw).map_err(|e| e.to_string())
}
