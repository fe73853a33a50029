// gateway/src/mock.rs
use async_trait::async_trait;
use era_rpc::{RpcRequest, RpcResponse, RpcResult, Transport};
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

type Handler = Box<dyn Fn(&RpcRequest) -> RpcResult<RpcResponse> + Send + Sync>;

/// In-memory transport that records every request it is given
pub(crate) struct MockTransport {
    handler: Handler,
    delay: Option<Duration>,
    requests: Mutex<Vec<RpcRequest>>,
}

impl MockTransport {
    pub fn new(
        handler: impl Fn(&RpcRequest) -> RpcResult<RpcResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with `result`
    pub fn replying(result: Value) -> Self {
        Self::new(move |request| Ok(RpcResponse::success(request.id, result.clone())))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<RpcRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RpcRequest) -> RpcResult<RpcResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(request)
    }
}
