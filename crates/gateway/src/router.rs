// gateway/src/router.rs
use crate::catalog::OperationSpec;
use crate::params::{build_params, OperationInput};
use crate::{shape, GatewayResult};
use era_rpc::{build_request, resolve, Credentials, HttpTransport, Transport, TransportConfig};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

/// Routes operations to the JSON-RPC endpoint behind `T`
pub struct Gateway<T> {
    transport: T,
    next_id: AtomicU64,
}

impl Gateway<HttpTransport> {
    /// Gateway over HTTP to the endpoint in `credentials`
    pub fn connect(credentials: Credentials, config: &TransportConfig) -> GatewayResult<Self> {
        Ok(Self::new(HttpTransport::new(credentials, config)?))
    }
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Send `method` with positional `params` and return the resolved result
    pub async fn call(&self, method: &str, params: Vec<Value>) -> GatewayResult<Value> {
        let request = build_request(method, params, self.next_id())?;
        let response = self.transport.send(&request).await?;
        let result = resolve(response)?;
        tracing::debug!(method, id = request.id, "RPC call resolved");
        Ok(result)
    }

    /// Run one operation for one item.
    ///
    /// Every parameter is validated before anything is sent, so an invalid
    /// item never reaches the network.
    pub async fn execute(
        &self,
        spec: &OperationSpec,
        input: &OperationInput,
    ) -> GatewayResult<Value> {
        let params = build_params(spec, input)?;
        let result = self.call(spec.method, params.clone()).await?;
        shape::apply(spec.shape, spec.method, &params, result)
    }
}
