// node/src/input.rs
use anyhow::Context;
use era_gateway::OperationInput;
use serde_json::Value;
use std::path::Path;

/// Parse a `key=value` flag.
///
/// Values that are valid JSON keep their JSON type; anything else is taken
/// as a plain string. Integers too large for a `u64` stay as their decimal
/// text so no digits are lost to floating point.
pub fn parse_param(raw: &str) -> anyhow::Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("expected key=value, got {:?}", raw))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("parameter name must not be empty in {:?}", raw);
    }
    let parsed = match serde_json::from_str::<Value>(value) {
        Ok(Value::Number(number)) if number.is_f64() && is_integer_text(value) => {
            Value::from(value.trim())
        }
        Ok(parsed) => parsed,
        Err(_) => Value::from(value),
    };
    Ok((key.to_string(), parsed))
}

fn is_integer_text(raw: &str) -> bool {
    let digits = raw.trim();
    let digits = digits.strip_prefix('-').unwrap_or(digits);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Build one input item from `key=value` flags
pub fn item_from_params(params: &[String]) -> anyhow::Result<OperationInput> {
    let mut input = OperationInput::new();
    for raw in params {
        let (key, value) = parse_param(raw)?;
        input.insert(key, value);
    }
    Ok(input)
}

/// Items from JSON text: an array of objects, or a single object
pub fn parse_items(text: &str) -> anyhow::Result<Vec<OperationInput>> {
    let value: Value = serde_json::from_str(text).context("input is not valid JSON")?;
    let values = match value {
        Value::Array(values) => values,
        single @ Value::Object(_) => vec![single],
        other => anyhow::bail!("expected an array of objects, got {}", other),
    };
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            OperationInput::try_from(value)
                .with_context(|| format!("item {} is not an object", index))
        })
        .collect()
}

pub fn read_items(path: impl AsRef<Path>) -> anyhow::Result<Vec<OperationInput>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_items(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use era_gateway::{build_params, lookup, Resource};
    use serde_json::json;

    #[test]
    fn test_parse_param_types() {
        assert_eq!(
            parse_param("address=0x1234567890123456789012345678901234567890").unwrap(),
            ("address".to_string(), json!("0x1234567890123456789012345678901234567890"))
        );
        assert_eq!(parse_param("logIndex=3").unwrap().1, json!(3));
        assert_eq!(parse_param("includeTransactions=true").unwrap().1, json!(true));
        assert_eq!(parse_param("keys=0x1, 0x2").unwrap().1, json!("0x1, 0x2"));
        assert_eq!(
            parse_param("transaction={\"to\":\"0xabc\"}").unwrap().1,
            json!({"to": "0xabc"})
        );
        assert_eq!(parse_param("data=").unwrap().1, json!(""));
    }

    #[test]
    fn test_parse_param_keeps_large_integers() {
        assert_eq!(
            parse_param("blockNumber=18446744073709551617").unwrap().1,
            json!("18446744073709551617")
        );
        assert_eq!(
            parse_param("logIndex=18446744073709551615").unwrap().1,
            json!(u64::MAX)
        );
        assert_eq!(parse_param("ratio=1.5").unwrap().1, json!(1.5));
    }

    #[test]
    fn test_max_storage_slot_from_flag() {
        let slot = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let item = item_from_params(&[
            "address=0x1234567890123456789012345678901234567890".to_string(),
            format!("position={}", slot),
        ])
        .unwrap();
        let spec = lookup(Resource::Contracts, "getStorageAt").unwrap();
        let params = build_params(spec, &item).unwrap();
        assert_eq!(params[1], json!(format!("0x{}", "f".repeat(64))));
        assert_eq!(params[2], json!("latest"));
    }

    #[test]
    fn test_parse_param_rejects_malformed() {
        assert!(parse_param("address").is_err());
        assert!(parse_param("=0x1").is_err());
    }

    #[test]
    fn test_item_from_params() {
        let flags = ["blockNumber=latest".to_string(), "address=0xabc".to_string()];
        let item = item_from_params(&flags).unwrap();
        assert_eq!(item.get("blockNumber"), Some(&json!("latest")));
        assert_eq!(item.len(), 2);
    }

    #[test]
    fn test_parse_items() {
        let items = parse_items(r#"[{"address": "0x1"}, {"address": "0x2"}]"#).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].get("address"), Some(&json!("0x2")));

        assert_eq!(parse_items(r#"{"address": "0x1"}"#).unwrap().len(), 1);
        assert!(parse_items("[1, 2]").is_err());
        assert!(parse_items("\"text\"").is_err());
    }

    #[test]
    fn test_read_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"[{}, {"txHash": "0x00"}]"#).unwrap();
        assert_eq!(read_items(&path).unwrap().len(), 2);
        assert!(read_items(dir.path().join("missing.json")).is_err());
    }
}
