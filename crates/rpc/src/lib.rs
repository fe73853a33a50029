// rpc/src/lib.rs

//! JSON-RPC 2.0 client layer for zkSync Era
//!
//! This crate provides:
//! - Request/response envelopes and the envelope builder
//! - HTTP transport with bearer authentication and timeouts
//! - Response resolution into a result or a typed protocol error

pub mod client;
pub mod resolve;
pub mod types;

pub use client::{Credentials, HttpTransport, Transport, TransportConfig, DEFAULT_TIMEOUT_MS};
pub use resolve::resolve;
pub use types::*;

use std::fmt;

/// Why a transport call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    /// Non-2xx response whose body is not a JSON-RPC envelope
    Status(u16),
    /// 2xx response whose body is not a JSON-RPC envelope
    Decode,
    Request,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Timeout => f.write_str("timeout"),
            TransportErrorKind::Connect => f.write_str("connect"),
            TransportErrorKind::Status(code) => write!(f, "HTTP {}", code),
            TransportErrorKind::Decode => f.write_str("decode"),
            TransportErrorKind::Request => f.write_str("request"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Invalid method: method name must not be empty")]
    InvalidMethod,
    #[error("zkSync Era API error {code}: {message}")]
    Protocol {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },
    #[error("Transport error ({kind}): {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RpcError {
    pub(crate) fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        RpcError::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Upstream error code, for protocol errors only
    pub fn code(&self) -> Option<i64> {
        match self {
            RpcError::Protocol { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            RpcError::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        )
    }
}

impl From<RpcErrorObject> for RpcError {
    fn from(error: RpcErrorObject) -> Self {
        RpcError::Protocol {
            code: error.code,
            message: error.message,
            data: error.data,
        }
    }
}

pub type RpcResult<T> = Result<T, RpcError>;
