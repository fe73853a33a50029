// primitives/src/lib.rs

//! Value types shared by the zkSync Era gateway
//!
//! This crate provides:
//! - Address and 32-byte hash validation
//! - Block number normalization (decimal, hex, tags)
//! - Hex quantity parsing and wei/ether formatting

pub mod address;
pub mod block;
pub mod quantity;

pub use address::{validate_hex_data, Address, H256};
pub use block::{format_block_number, BlockNumber, BlockTag};
pub use quantity::{parse_integer, parse_quantity, to_hex_quantity, Wei};

/// Result type for primitive parsing
pub type PrimitiveResult<T> = Result<T, PrimitiveError>;

/// Errors raised while parsing user-supplied values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitiveError {
    #[error(
        "Invalid address format: {0}. \
         Address must be a 40-character hex string starting with 0x"
    )]
    InvalidAddress(String),

    #[error("Invalid hash format: {0}. Hash must be a 64-character hex string starting with 0x")]
    InvalidHash(String),

    #[error("Invalid hex data: {0}")]
    InvalidHexData(String),

    #[error(
        "Invalid block number: {0}. \
         Use a decimal or 0x-prefixed hex number, or latest, earliest, pending"
    )]
    InvalidBlockNumber(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}
