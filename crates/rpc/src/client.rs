// rpc/src/client.rs
use crate::{RpcError, RpcRequest, RpcResponse, RpcResult, TransportErrorKind};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::fmt;
use std::time::Duration;

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Longest slice of a non-envelope body quoted in an error
const BODY_EXCERPT_LEN: usize = 200;

/// Endpoint and optional API key, resolved once per invocation
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Credentials {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// API key, if one is set and non-empty
    pub fn bearer_token(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("api_key", &self.bearer_token().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout (connect + send + receive)
    pub timeout: Duration,
    pub pool_idle_timeout: Duration,
}

impl TransportConfig {
    pub fn from_millis(timeout_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            ..Default::default()
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

/// Sends one envelope and returns the parsed response envelope.
///
/// Implementations never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RpcRequest) -> RpcResult<RpcResponse>;
}

/// JSON-RPC over HTTP POST, sharing one pooled client across calls
pub struct HttpTransport {
    client: reqwest::Client,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(credentials: Credentials, config: &TransportConfig) -> RpcResult<Self> {
        if credentials.base_url.trim().is_empty() {
            return Err(RpcError::transport(
                TransportErrorKind::Request,
                "base URL must not be empty",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .build()
            .map_err(|e| RpcError::transport(TransportErrorKind::Request, e.to_string()))?;

        Ok(Self {
            client,
            credentials,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RpcRequest) -> RpcResult<RpcResponse> {
        // Serialized by hand so the body is exactly the envelope as built.
        let body = serde_json::to_vec(request).map_err(|e| RpcError::Serialization(e.to_string()))?;

        tracing::debug!(
            method = %request.method,
            id = request.id,
            url = %self.credentials.base_url,
            "Sending RPC request"
        );

        let mut builder = self
            .client
            .post(&self.credentials.base_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(token) = self.credentials.bearer_token() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(classify_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(classify_error)?;

        match RpcResponse::from_slice(&bytes) {
            Ok(envelope) => {
                if !status.is_success() {
                    tracing::debug!(
                        status = status.as_u16(),
                        "Non-2xx response carried an RPC envelope"
                    );
                }
                Ok(envelope)
            }
            Err(_) if !status.is_success() => Err(RpcError::transport(
                TransportErrorKind::Status(status.as_u16()),
                format!("{}: {}", status, excerpt(&bytes)),
            )),
            Err(e) => Err(RpcError::transport(
                TransportErrorKind::Decode,
                format!("response is not a JSON-RPC envelope: {}", e),
            )),
        }
    }
}

fn classify_error(error: reqwest::Error) -> RpcError {
    let kind = if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_connect() {
        TransportErrorKind::Connect
    } else if error.is_decode() || error.is_body() {
        TransportErrorKind::Decode
    } else {
        TransportErrorKind::Request
    };
    tracing::warn!(%kind, error = %error, "RPC transport failure");
    RpcError::transport(kind, error.to_string())
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut excerpt: String = text.chars().take(BODY_EXCERPT_LEN).collect();
    if text.chars().count() > BODY_EXCERPT_LEN {
        excerpt.push_str("...");
    }
    excerpt
}
