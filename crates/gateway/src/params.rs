// gateway/src/params.rs
use crate::catalog::{Fallback, FieldKind, OperationSpec, Param, Presence};
use crate::InputError;
use era_primitives::{
    format_block_number, parse_integer, parse_quantity, to_hex_quantity, validate_hex_data,
    Address, BlockNumber, PrimitiveError, H256,
};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named input values for one item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationInput(Map<String, Value>);

impl OperationInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Value of `field`, treating `null` and the empty string as missing
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self.0.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for OperationInput {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for OperationInput {
    type Error = InputError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(InputError::InvalidJson {
                field: "item".to_string(),
                reason: format!("expected an object, got {}", other),
            }),
        }
    }
}

/// Validate `input` against every parameter rule of `spec` and return the
/// positional parameter list in declared order.
pub fn build_params(
    spec: &OperationSpec,
    input: &OperationInput,
) -> Result<Vec<Value>, InputError> {
    let mut params = Vec::with_capacity(spec.params.len());
    for param in spec.params {
        let value = match *param {
            Param::Field {
                name,
                kind,
                presence,
            } => field(input, name, kind, presence)?,
            Param::PaymasterTransaction => Some(paymaster_transaction(input)?),
            Param::CallObject => Some(call_object(input)?),
            Param::LogFilter => Some(log_filter(input)?),
        };
        if let Some(value) = value {
            params.push(value);
        }
    }
    Ok(params)
}

fn field(
    input: &OperationInput,
    name: &str,
    kind: FieldKind,
    presence: Presence,
) -> Result<Option<Value>, InputError> {
    match (input.get(name), presence) {
        (Some(value), _) => encode(name, kind, value).map(Some),
        (None, Presence::Required) => Err(missing(name)),
        (None, Presence::Default(fallback)) => {
            encode(name, kind, &fallback_value(fallback)).map(Some)
        }
        (None, Presence::OmitIfAbsent) => Ok(None),
    }
}

fn fallback_value(fallback: Fallback) -> Value {
    match fallback {
        Fallback::Str(s) => Value::from(s),
        Fallback::Bool(b) => Value::from(b),
        Fallback::Uint(n) => Value::from(n),
    }
}

fn missing(field: &str) -> InputError {
    InputError::MissingParameter {
        field: field.to_string(),
    }
}

/// String content of a value; other JSON values use their JSON text
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn encode(name: &str, kind: FieldKind, value: &Value) -> Result<Value, InputError> {
    let encoded = match kind {
        FieldKind::Address => Value::from(String::from(Address::parse(&text(value))?)),
        FieldKind::Hash => Value::from(String::from(H256::parse(&text(value))?)),
        FieldKind::HexData => Value::from(validate_hex_data(&text(value))?),
        FieldKind::Quantity => Value::from(quantity(value)?),
        FieldKind::BlockNumber => match value.as_u64() {
            Some(number) => Value::from(BlockNumber::from(number).to_string()),
            None => Value::from(format_block_number(&text(value))?),
        },
        FieldKind::Integer => Value::from(integer(name, value)?),
        FieldKind::Bool => Value::from(boolean(name, value)?),
        FieldKind::Object => Value::Object(object(name, value)?),
        FieldKind::KeyList => Value::from(key_list(name, value)?),
    };
    Ok(encoded)
}

/// Hex quantities pass through as given; decimal input is converted
fn quantity(value: &Value) -> Result<String, PrimitiveError> {
    if let Some(number) = value.as_u64() {
        return Ok(to_hex_quantity(&BigUint::from(number)));
    }
    let raw = text(value);
    let trimmed = raw.trim();
    if trimmed.starts_with("0x") {
        parse_quantity(trimmed)?;
        return Ok(trimmed.to_string());
    }
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(PrimitiveError::InvalidQuantity(raw));
    }
    let number = trimmed
        .parse::<BigUint>()
        .map_err(|_| PrimitiveError::InvalidQuantity(raw.clone()))?;
    Ok(to_hex_quantity(&number))
}

fn integer(name: &str, value: &Value) -> Result<u64, InputError> {
    let invalid = || InputError::InvalidInteger {
        field: name.to_string(),
        value: text(value),
    };
    match value {
        Value::Number(number) => number.as_u64().ok_or_else(invalid),
        Value::String(s) => parse_integer(s).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn boolean(name: &str, value: &Value) -> Result<bool, InputError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(InputError::InvalidBoolean {
            field: name.to_string(),
            value: text(other),
        }),
    }
}

fn object(name: &str, value: &Value) -> Result<Map<String, Value>, InputError> {
    let invalid = |reason: String| InputError::InvalidJson {
        field: name.to_string(),
        reason,
    };
    let parsed = match value {
        Value::Object(map) => return Ok(map.clone()),
        Value::String(s) => serde_json::from_str::<Value>(s).map_err(|e| invalid(e.to_string()))?,
        other => return Err(invalid(format!("expected an object, got {}", other))),
    };
    match parsed {
        Value::Object(map) => Ok(map),
        other => Err(invalid(format!("expected an object, got {}", other))),
    }
}

fn key_list(name: &str, value: &Value) -> Result<Vec<String>, InputError> {
    match value {
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from)
            .collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(key) => Ok(key.trim().to_string()),
                other => Err(InputError::InvalidJson {
                    field: name.to_string(),
                    reason: format!("expected a list of strings, found {}", other),
                }),
            })
            .filter(|key| !matches!(key, Ok(k) if k.is_empty()))
            .collect(),
        other => Err(InputError::InvalidJson {
            field: name.to_string(),
            reason: format!("expected a comma-separated list, got {}", other),
        }),
    }
}

fn paymaster_transaction(input: &OperationInput) -> Result<Value, InputError> {
    let raw = input.get("transaction").ok_or_else(|| missing("transaction"))?;
    let mut transaction = object("transaction", raw)?;

    if let Some(paymaster) = input.get("paymasterAddress") {
        let paymaster = Address::parse(&text(paymaster))?;
        let paymaster_input = match input.get("paymasterInput") {
            Some(data) => validate_hex_data(&text(data))?.to_string(),
            None => "0x".to_string(),
        };
        transaction.insert("paymaster".to_string(), Value::from(String::from(paymaster)));
        transaction.insert("paymasterInput".to_string(), Value::from(paymaster_input));
    }

    Ok(Value::Object(transaction))
}

fn call_object(input: &OperationInput) -> Result<Value, InputError> {
    let to = input.get("to").ok_or_else(|| missing("to"))?;
    let mut call = Map::new();
    call.insert("to".to_string(), encode("to", FieldKind::Address, to)?);
    if let Some(data) = input.get("data") {
        call.insert("data".to_string(), encode("data", FieldKind::HexData, data)?);
    }
    Ok(Value::Object(call))
}

fn log_filter(input: &OperationInput) -> Result<Value, InputError> {
    let mut filter = Map::new();

    for name in ["fromBlock", "toBlock"] {
        if let Some(block) = input.get(name) {
            filter.insert(name.to_string(), encode(name, FieldKind::BlockNumber, block)?);
        }
    }

    if let Some(address) = input.get("address") {
        let encoded = match address {
            Value::Array(addresses) => Value::Array(
                addresses
                    .iter()
                    .map(|a| encode("address", FieldKind::Address, a))
                    .collect::<Result<_, _>>()?,
            ),
            single => encode("address", FieldKind::Address, single)?,
        };
        filter.insert("address".to_string(), encoded);
    }

    if let Some(topics) = input.get("topics") {
        filter.insert("topics".to_string(), self::topics(topics)?);
    }

    if let Some(hash) = input.get("blockHash") {
        filter.insert("blockHash".to_string(), encode("blockHash", FieldKind::Hash, hash)?);
    }

    Ok(Value::Object(filter))
}

fn topics(value: &Value) -> Result<Value, InputError> {
    let parsed = match value {
        Value::Array(_) => return Ok(value.clone()),
        Value::String(s) => {
            serde_json::from_str::<Value>(s).map_err(|e| InputError::InvalidTopics(e.to_string()))?
        }
        other => other.clone(),
    };
    match parsed {
        Value::Array(_) => Ok(parsed),
        other => Err(InputError::InvalidTopics(format!("expected an array, got {}", other))),
    }
}
