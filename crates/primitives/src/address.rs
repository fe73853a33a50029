// primitives/src/address.rs

use crate::{PrimitiveError, PrimitiveResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").unwrap())
}

fn hash_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^0x[a-fA-F0-9]{64}$").unwrap())
}

/// A 20-byte account or contract address.
///
/// Input casing is kept so checksummed addresses go upstream
/// exactly as the user typed them.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and validate against `^0x[a-fA-F0-9]{40}$`
    pub fn parse(s: &str) -> PrimitiveResult<Self> {
        if address_pattern().is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(PrimitiveError::InvalidAddress(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase hex form, useful for comparisons
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl FromStr for Address {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = PrimitiveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 32-byte hash (transaction, block, bytecode or message hash)
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct H256(String);

impl H256 {
    pub fn parse(s: &str) -> PrimitiveResult<Self> {
        if hash_pattern().is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(PrimitiveError::InvalidHash(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for H256 {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for H256 {
    type Error = PrimitiveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<H256> for String {
    fn from(hash: H256) -> Self {
        hash.0
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({}...{})", &self.0[..10], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check that `s` is `0x` followed by whole bytes of hex.
///
/// `"0x"` on its own is valid empty data.
pub fn validate_hex_data(s: &str) -> PrimitiveResult<&str> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| PrimitiveError::InvalidHexData(format!("{} (missing 0x prefix)", s)))?;
    hex::decode(digits).map_err(|e| PrimitiveError::InvalidHexData(format!("{} ({})", s, e)))?;
    Ok(s)
}
