// primitives/src/block.rs

use crate::{PrimitiveError, PrimitiveResult};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named block tags accepted in place of a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    Latest,
    Earliest,
    Pending,
}

impl BlockTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockTag::Latest => "latest",
            BlockTag::Earliest => "earliest",
            BlockTag::Pending => "pending",
        }
    }
}

impl FromStr for BlockTag {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(BlockTag::Latest),
            "earliest" => Ok(BlockTag::Earliest),
            "pending" => Ok(BlockTag::Pending),
            other => Err(PrimitiveError::InvalidBlockNumber(other.to_string())),
        }
    }
}

/// Block selector in the canonical wire form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockNumber {
    Tag(BlockTag),
    /// `0x`-prefixed hex, kept exactly as given
    Hex(String),
}

impl BlockNumber {
    pub fn latest() -> Self {
        BlockNumber::Tag(BlockTag::Latest)
    }
}

impl Default for BlockNumber {
    fn default() -> Self {
        Self::latest()
    }
}

impl FromStr for BlockNumber {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || PrimitiveError::InvalidBlockNumber(s.to_string());

        if let Ok(tag) = trimmed.parse::<BlockTag>() {
            return Ok(BlockNumber::Tag(tag));
        }

        if let Some(digits) = trimmed.strip_prefix("0x") {
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            return Ok(BlockNumber::Hex(trimmed.to_string()));
        }

        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let value = BigUint::parse_bytes(trimmed.as_bytes(), 10).ok_or_else(invalid)?;
        Ok(BlockNumber::Hex(format!("0x{:x}", value)))
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockNumber::Tag(tag) => f.write_str(tag.as_str()),
            BlockNumber::Hex(hex) => f.write_str(hex),
        }
    }
}

impl From<u64> for BlockNumber {
    fn from(number: u64) -> Self {
        BlockNumber::Hex(format!("0x{:x}", number))
    }
}

/// Normalize a user-supplied block number to its wire form.
///
/// Decimal strings become `0x`-prefixed hex; hex strings and the
/// `latest`/`earliest`/`pending` tags pass through unchanged.
pub fn format_block_number(value: &str) -> PrimitiveResult<String> {
    value.parse::<BlockNumber>().map(|block| block.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tags_pass_through() {
        for tag in ["latest", "earliest", "pending"] {
            assert_eq!(format_block_number(tag).unwrap(), tag);
        }
    }

    #[test]
    fn test_decimal_converted() {
        assert_eq!(format_block_number("0").unwrap(), "0x0");
        assert_eq!(format_block_number("255").unwrap(), "0xff");
        assert_eq!(format_block_number("12345678").unwrap(), "0xbc614e");
    }

    #[test]
    fn test_hex_unchanged() {
        assert_eq!(format_block_number("0x1b4").unwrap(), "0x1b4");
        assert_eq!(format_block_number("0x00FF").unwrap(), "0x00FF");
    }

    #[test]
    fn test_large_decimal() {
        assert_eq!(
            format_block_number("18446744073709551616").unwrap(),
            "0x10000000000000000"
        );
    }

    #[test]
    fn test_invalid() {
        for bad in ["", "abc", "Latest", "0x", "0xzz", "12abc", "-1", "1.5", "safe"] {
            assert_eq!(
                format_block_number(bad),
                Err(PrimitiveError::InvalidBlockNumber(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_u64() {
        assert_eq!(BlockNumber::from(26u64).to_string(), "0x1a");
        assert_eq!(BlockNumber::default().to_string(), "latest");
    }

    proptest! {
        #[test]
        fn prop_decimal_becomes_hex(n in any::<u64>()) {
            prop_assert_eq!(format_block_number(&n.to_string()).unwrap(), format!("0x{:x}", n));
        }

        #[test]
        fn prop_hex_passes_through(digits in "[0-9a-fA-F]{1,16}") {
            let hex = format!("0x{}", digits);
            prop_assert_eq!(format_block_number(&hex).unwrap(), hex);
        }

        #[test]
        fn prop_idempotent(n in any::<u64>(), tag in prop_oneof!["latest", "earliest", "pending"]) {
            for input in [n.to_string(), format!("0x{:x}", n), tag.to_string()] {
                let once = format_block_number(&input).unwrap();
                prop_assert_eq!(format_block_number(&once).unwrap(), once);
            }
        }
    }
}
