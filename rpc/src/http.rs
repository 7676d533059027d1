//! reqwest-backed JSON-RPC endpoint.

use async_trait::async_trait;
use burnproof_types::TxSignature;
use std::time::Duration;

use crate::wire::{JsonRpcRequest, JsonRpcResponse};
use crate::{EncodedTransaction, RpcError, TransactionSource};

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// A single ledger RPC endpoint reached over HTTP(S).
///
/// Wraps a `reqwest::Client` (reusable connection pool) and the endpoint URL.
#[derive(Clone)]
pub struct HttpRpcEndpoint {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpRpcEndpoint {
    /// Create an endpoint whose requests are bounded by `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn classify(&self, e: reqwest::Error) -> RpcError {
        if e.is_timeout() {
            RpcError::Timeout {
                endpoint: self.url.clone(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else if e.is_connect() {
            RpcError::Transport(format!("connection failed: {e}"))
        } else {
            RpcError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl TransactionSource for HttpRpcEndpoint {
    async fn get_transaction(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<EncodedTransaction>, RpcError> {
        let response = self
            .http
            .post(&self.url)
            .json(&JsonRpcRequest::get_transaction(signature))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(RpcError::HttpStatus(response.status().as_u16()));
        }

        let body: JsonRpcResponse<EncodedTransaction> = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
            });
        }

        tracing::trace!(
            endpoint = %self.url,
            signature = %signature,
            found = body.result.is_some(),
            "getTransaction answered"
        );
        Ok(body.result)
    }

    fn name(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let endpoint =
            HttpRpcEndpoint::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let sig = TxSignature::parse(&"a".repeat(64)).unwrap();
        let err = endpoint.get_transaction(&sig).await.unwrap_err();
        assert!(matches!(
            err,
            RpcError::Transport(_) | RpcError::Timeout { .. }
        ));
    }
}
