// primitives/src/quantity.rs

use crate::{PrimitiveError, PrimitiveResult};
use num_bigint::BigUint;
use num_traits::{Num, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimals of the native token (1 ETH = 10^18 wei)
pub const ETHER_DECIMALS: u32 = 18;

/// Parse a `0x`-prefixed hex quantity
pub fn parse_quantity(s: &str) -> PrimitiveResult<BigUint> {
    let digits = s
        .strip_prefix("0x")
        .filter(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| PrimitiveError::InvalidQuantity(s.to_string()))?;
    BigUint::from_str_radix(digits, 16).map_err(|_| PrimitiveError::InvalidQuantity(s.to_string()))
}

/// Minimal `0x` hex encoding of a quantity
pub fn to_hex_quantity(value: &BigUint) -> String {
    format!("0x{:x}", value)
}

/// Parse an integer given either as decimal or `0x` hex
pub fn parse_integer(s: &str) -> PrimitiveResult<u64> {
    let trimmed = s.trim();
    let parsed = match trimmed.strip_prefix("0x") {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|_| PrimitiveError::InvalidQuantity(s.to_string()))
}

/// Native token amount in wei (arbitrary precision)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Wei(BigUint);

impl Wei {
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn from_u64(value: u64) -> Self {
        Self(BigUint::from(value))
    }

    pub fn from_ether(ether: u64) -> Self {
        Self(BigUint::from(ether) * Self::ether_unit())
    }

    /// Parse a hex quantity as returned by `eth_getBalance`
    pub fn from_hex(s: &str) -> PrimitiveResult<Self> {
        parse_quantity(s).map(Self)
    }

    pub fn to_hex(&self) -> String {
        to_hex_quantity(&self.0)
    }

    /// Exact decimal ether representation, trailing zeros trimmed
    pub fn to_ether_string(&self) -> String {
        let unit = Self::ether_unit();
        let whole = &self.0 / &unit;
        let fraction = &self.0 % &unit;
        if fraction.is_zero() {
            return whole.to_string();
        }
        let padded = format!("{:0>width$}", fraction.to_string(), width = ETHER_DECIMALS as usize);
        format!("{}.{}", whole, padded.trim_end_matches('0'))
    }

    fn ether_unit() -> BigUint {
        BigUint::from(10u64).pow(ETHER_DECIMALS)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
