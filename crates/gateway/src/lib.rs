// gateway/src/lib.rs

//! zkSync Era operation gateway
//!
//! This crate provides:
//! - The static table of supported operations
//! - Parameter extraction and validation per operation
//! - The router that calls the RPC transport and shapes results
//! - The per-item batch executor

pub mod catalog;
pub mod executor;
#[cfg(test)]
mod mock;
pub mod params;
pub mod router;
pub mod shape;

pub use catalog::{
    catalog, lookup, resolve_operation, Fallback, FieldKind, OperationSpec, Param, Presence,
    Resource, Shape,
};
pub use executor::{execute_batch, BatchError, ExecutionRecord, Outcome, PairedItem};
pub use params::{build_params, OperationInput};
pub use router::Gateway;

use era_primitives::PrimitiveError;
use era_rpc::RpcError;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Problems with a single item's input, raised before any network call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Missing required parameter: {field}")]
    MissingParameter { field: String },

    #[error("Invalid JSON in parameter {field}: {reason}")]
    InvalidJson { field: String, reason: String },

    #[error("Invalid topics: {0}")]
    InvalidTopics(String),

    #[error("Invalid integer for {field}: {value}")]
    InvalidInteger { field: String, value: String },

    #[error("Invalid boolean for {field}: {value}")]
    InvalidBoolean { field: String, value: String },

    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
}

/// Errors that can occur while executing an operation
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("The resource \"{0}\" is not supported")]
    UnsupportedResource(String),

    #[error("Unknown operation: {operation} (resource {resource})")]
    UnsupportedOperation { resource: String, operation: String },

    #[error("Unexpected result from {method}: {reason}")]
    UnexpectedResult { method: String, reason: String },

    #[error("Execution cancelled")]
    Cancelled,
}

impl From<PrimitiveError> for GatewayError {
    fn from(error: PrimitiveError) -> Self {
        GatewayError::InvalidInput(InputError::Primitive(error))
    }
}

impl GatewayError {
    /// Whether the batch must stop even when item failures are tolerated
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GatewayError::Cancelled
                | GatewayError::UnsupportedResource(_)
                | GatewayError::UnsupportedOperation { .. }
        )
    }
}
