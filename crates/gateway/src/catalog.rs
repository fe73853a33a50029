// gateway/src/catalog.rs

//! Static dispatch table from (resource, operation) to JSON-RPC method

use crate::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level grouping of operations, as named by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Accounts,
    Transactions,
    Blocks,
    Paymasters,
    Proofs,
    Contracts,
    Tokens,
    Logs,
    Network,
    Bridging,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Accounts,
        Resource::Transactions,
        Resource::Blocks,
        Resource::Paymasters,
        Resource::Proofs,
        Resource::Contracts,
        Resource::Tokens,
        Resource::Logs,
        Resource::Network,
        Resource::Bridging,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Accounts => "accounts",
            Resource::Transactions => "transactions",
            Resource::Blocks => "blocks",
            Resource::Paymasters => "paymasters",
            Resource::Proofs => "proofs",
            Resource::Contracts => "contracts",
            Resource::Tokens => "tokens",
            Resource::Logs => "logs",
            Resource::Network => "network",
            Resource::Bridging => "bridging",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .iter()
            .copied()
            .find(|resource| resource.as_str() == s)
            .ok_or_else(|| GatewayError::UnsupportedResource(s.to_string()))
    }
}

/// How a single field is validated and encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 20-byte `0x` address
    Address,
    /// 32-byte `0x` hash
    Hash,
    /// `0x`-prefixed whole-byte hex (signed transactions, call data)
    HexData,
    /// Hex quantity; decimal input is converted
    Quantity,
    /// Block number or tag, normalized to wire form
    BlockNumber,
    /// Emitted as a JSON integer
    Integer,
    Bool,
    /// JSON object, or a string holding one
    Object,
    /// Comma-separated list, emitted as an array of trimmed strings
    KeyList,
}

/// Value used when a defaulted field is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Str(&'static str),
    Bool(bool),
    Uint(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Default(Fallback),
    /// Dropped from the positional list when missing; only valid last
    OmitIfAbsent,
}

/// One positional parameter of a method call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Field {
        name: &'static str,
        kind: FieldKind,
        presence: Presence,
    },
    /// `transaction` with `paymaster`/`paymasterInput` merged in when `paymasterAddress` is set
    PaymasterTransaction,
    /// `{to, data?}` built from the `to` and `data` fields
    CallObject,
    /// Filter object from `fromBlock`, `toBlock`, `address`, `topics`, `blockHash`
    LogFilter,
}

impl Param {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Param::Field {
            name,
            kind,
            presence: Presence::Required,
        }
    }

    pub const fn defaulted(name: &'static str, kind: FieldKind, fallback: Fallback) -> Self {
        Param::Field {
            name,
            kind,
            presence: Presence::Default(fallback),
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Param::Field {
            name,
            kind,
            presence: Presence::OmitIfAbsent,
        }
    }
}

/// Post-processing applied to a resolved result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Identity,
    Balance,
    AccountDetails,
    Nonce,
    AllBalances,
    Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub resource: Resource,
    pub operation: &'static str,
    pub method: &'static str,
    pub params: &'static [Param],
    pub shape: Shape,
}

use FieldKind::*;

const LATEST: Fallback = Fallback::Str("latest");

const ADDRESS: Param = Param::required("address", Address);
const AT_BLOCK: Param = Param::defaulted("blockNumber", BlockNumber, LATEST);
const ADDRESS_AT_BLOCK: &[Param] = &[ADDRESS, AT_BLOCK];
const TRANSACTION: Param = Param::required("transaction", Object);
const TRANSACTION_AT_BLOCK: &[Param] = &[TRANSACTION, AT_BLOCK];
const SIGNED_TRANSACTION: &[Param] = &[Param::required("signedTransaction", HexData)];
const TOKEN_ADDRESS: &[Param] = &[Param::required("tokenAddress", Address)];
const BATCH_NUMBER: &[Param] = &[Param::required("batchNumber", Integer)];
const FILTER_ID: &[Param] = &[Param::required("filterId", Quantity)];
const LOG_PROOF: &[Param] = &[
    Param::required("txHash", Hash),
    Param::defaulted("logIndex", Integer, Fallback::Uint(0)),
];
const MSG_PROOF: &[Param] = &[
    Param::required("blockNumber", Integer),
    Param::required("sender", Address),
    Param::required("msgHash", Hash),
    Param::optional("l2LogPosition", Integer),
];

const fn op(
    resource: Resource,
    operation: &'static str,
    method: &'static str,
    params: &'static [Param],
    shape: Shape,
) -> OperationSpec {
    OperationSpec {
        resource,
        operation,
        method,
        params,
        shape,
    }
}

static CATALOG: &[OperationSpec] = &[
    // accounts
    op(Resource::Accounts, "getBalance", "eth_getBalance", ADDRESS_AT_BLOCK, Shape::Balance),
    op(
        Resource::Accounts,
        "getAccountDetails",
        "zks_getAccount",
        ADDRESS_AT_BLOCK,
        Shape::AccountDetails,
    ),
    op(
        Resource::Accounts,
        "getTransactionCount",
        "eth_getTransactionCount",
        ADDRESS_AT_BLOCK,
        Shape::Nonce,
    ),
    op(
        Resource::Accounts,
        "getAllAccountBalances",
        "zks_getAllAccountBalances",
        &[ADDRESS],
        Shape::AllBalances,
    ),
    // transactions
    op(
        Resource::Transactions,
        "sendRawTransaction",
        "eth_sendRawTransaction",
        SIGNED_TRANSACTION,
        Shape::Identity,
    ),
    op(
        Resource::Transactions,
        "getTransactionByHash",
        "eth_getTransactionByHash",
        &[Param::required("transactionHash", Hash)],
        Shape::Identity,
    ),
    op(
        Resource::Transactions,
        "getTransactionReceipt",
        "eth_getTransactionReceipt",
        &[Param::required("transactionHash", Hash)],
        Shape::Identity,
    ),
    op(Resource::Transactions, "estimateFee", "zks_estimateFee", &[TRANSACTION], Shape::Identity),
    op(
        Resource::Transactions,
        "estimateGasL1ToL2",
        "zks_estimateGasL1ToL2",
        &[TRANSACTION],
        Shape::Quantity,
    ),
    op(Resource::Transactions, "call", "eth_call", TRANSACTION_AT_BLOCK, Shape::Identity),
    // blocks
    op(Resource::Blocks, "getBlockNumber", "eth_blockNumber", &[], Shape::Quantity),
    op(
        Resource::Blocks,
        "getBlockByNumber",
        "eth_getBlockByNumber",
        &[
            AT_BLOCK,
            Param::defaulted("includeTransactions", Bool, Fallback::Bool(false)),
        ],
        Shape::Identity,
    ),
    op(
        Resource::Blocks,
        "getBlockByHash",
        "eth_getBlockByHash",
        &[
            Param::required("blockHash", Hash),
            Param::defaulted("includeTransactions", Bool, Fallback::Bool(false)),
        ],
        Shape::Identity,
    ),
    op(Resource::Blocks, "getL1BatchNumber", "zks_getL1BatchNumber", &[], Shape::Quantity),
    op(
        Resource::Blocks,
        "getL1BatchDetails",
        "zks_getL1BatchDetails",
        BATCH_NUMBER,
        Shape::Identity,
    ),
    op(
        Resource::Blocks,
        "getBlockDetails",
        "zks_getBlockDetails",
        &[Param::required("blockNumber", Integer)],
        Shape::Identity,
    ),
    // paymasters
    op(
        Resource::Paymasters,
        "estimateFee",
        "zks_estimateFee",
        &[Param::PaymasterTransaction],
        Shape::Identity,
    ),
    op(
        Resource::Paymasters,
        "sendTransaction",
        "eth_sendRawTransaction",
        SIGNED_TRANSACTION,
        Shape::Identity,
    ),
    op(Resource::Paymasters, "getTokenPrice", "zks_getTokenPrice", TOKEN_ADDRESS, Shape::Identity),
    // proofs
    op(
        Resource::Proofs,
        "getProof",
        "zks_getProof",
        &[
            ADDRESS,
            Param::required("keys", KeyList),
            Param::required("l1BatchNumber", Integer),
        ],
        Shape::Identity,
    ),
    op(
        Resource::Proofs,
        "getL1BatchDetails",
        "zks_getL1BatchDetails",
        BATCH_NUMBER,
        Shape::Identity,
    ),
    op(Resource::Proofs, "getL2ToL1LogProof", "zks_getL2ToL1LogProof", LOG_PROOF, Shape::Identity),
    op(Resource::Proofs, "getL2ToL1MsgProof", "zks_getL2ToL1MsgProof", MSG_PROOF, Shape::Identity),
    // contracts
    op(Resource::Contracts, "callFunction", "eth_call", TRANSACTION_AT_BLOCK, Shape::Identity),
    op(Resource::Contracts, "estimateGas", "eth_estimateGas", &[TRANSACTION], Shape::Quantity),
    op(
        Resource::Contracts,
        "getDetails",
        "zks_getContractDetails",
        &[Param::required("contractAddress", Address)],
        Shape::Identity,
    ),
    op(Resource::Contracts, "getCode", "eth_getCode", ADDRESS_AT_BLOCK, Shape::Identity),
    op(
        Resource::Contracts,
        "getStorageAt",
        "eth_getStorageAt",
        &[
            ADDRESS,
            Param::required("position", Quantity),
            AT_BLOCK,
        ],
        Shape::Identity,
    ),
    op(
        Resource::Contracts,
        "getBytecodeByHash",
        "zks_getBytecodeByHash",
        &[Param::required("bytecodeHash", Hash)],
        Shape::Identity,
    ),
    // tokens
    op(
        Resource::Tokens,
        "getAllAccountBalances",
        "zks_getAllAccountBalances",
        &[ADDRESS],
        Shape::AllBalances,
    ),
    op(Resource::Tokens, "getTokenPrice", "zks_getTokenPrice", TOKEN_ADDRESS, Shape::Identity),
    op(
        Resource::Tokens,
        "getConfirmedTokens",
        "zks_getConfirmedTokens",
        &[
            Param::defaulted("from", Integer, Fallback::Uint(0)),
            Param::defaulted("limit", Integer, Fallback::Uint(100)),
        ],
        Shape::Identity,
    ),
    op(
        Resource::Tokens,
        "callTokenContract",
        "eth_call",
        &[Param::CallObject, AT_BLOCK],
        Shape::Identity,
    ),
    // logs
    op(Resource::Logs, "getLogs", "eth_getLogs", &[Param::LogFilter], Shape::Identity),
    op(Resource::Logs, "newFilter", "eth_newFilter", &[Param::LogFilter], Shape::Identity),
    op(Resource::Logs, "getFilterChanges", "eth_getFilterChanges", FILTER_ID, Shape::Identity),
    op(Resource::Logs, "uninstallFilter", "eth_uninstallFilter", FILTER_ID, Shape::Identity),
    // network
    op(Resource::Network, "getChainId", "eth_chainId", &[], Shape::Quantity),
    op(Resource::Network, "getGasPrice", "eth_gasPrice", &[], Shape::Quantity),
    op(Resource::Network, "getNetVersion", "net_version", &[], Shape::Identity),
    op(Resource::Network, "getMainContract", "zks_getMainContract", &[], Shape::Identity),
    op(Resource::Network, "getBridgehubContract", "zks_getBridgehubContract", &[], Shape::Identity),
    op(
        Resource::Network,
        "getBaseTokenL1Address",
        "zks_getBaseTokenL1Address",
        &[],
        Shape::Identity,
    ),
    // bridging
    op(
        Resource::Bridging,
        "estimateGasL1ToL2",
        "zks_estimateGasL1ToL2",
        &[TRANSACTION],
        Shape::Quantity,
    ),
    op(
        Resource::Bridging,
        "getL2ToL1LogProof",
        "zks_getL2ToL1LogProof",
        LOG_PROOF,
        Shape::Identity,
    ),
    op(
        Resource::Bridging,
        "getL2ToL1MsgProof",
        "zks_getL2ToL1MsgProof",
        MSG_PROOF,
        Shape::Identity,
    ),
];

/// Every supported operation, grouped by resource in declaration order
pub fn catalog() -> &'static [OperationSpec] {
    CATALOG
}

/// Find the operation registered for `resource`/`operation`
pub fn lookup(resource: Resource, operation: &str) -> GatewayResult<&'static OperationSpec> {
    CATALOG
        .iter()
        .find(|spec| spec.resource == resource && spec.operation == operation)
        .ok_or_else(|| GatewayError::UnsupportedOperation {
            resource: resource.to_string(),
            operation: operation.to_string(),
        })
}

/// Parse both names and look the pair up
pub fn resolve_operation(resource: &str, operation: &str) -> GatewayResult<&'static OperationSpec> {
    lookup(resource.parse()?, operation)
}
