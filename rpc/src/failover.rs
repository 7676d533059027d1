//! Ordered failover across the endpoints of one network.
//!
//! Endpoints are tried strictly in configured order. An endpoint that errors
//! or exceeds its sub-timeout is skipped and the next one is tried; the first
//! endpoint that answers (found or not found) wins. Only when every endpoint
//! has failed does the fetch fail.

use burnproof_types::{Network, TxSignature};
use std::sync::Arc;
use std::time::Duration;

use crate::{EncodedTransaction, RpcError, TransactionSource};

/// Outcome of a successful fetch.
#[derive(Debug)]
pub struct Fetched {
    /// `None` when the answering endpoint does not know the signature.
    pub transaction: Option<EncodedTransaction>,
    /// Name of the endpoint that answered.
    pub endpoint: String,
    /// How many endpoints failed before this one answered.
    pub failed_attempts: usize,
}

/// The endpoint list of one network, with per-endpoint timeouts.
#[derive(Clone)]
pub struct FailoverClient {
    network: Network,
    endpoints: Vec<Arc<dyn TransactionSource>>,
    endpoint_timeout: Duration,
}

impl FailoverClient {
    pub fn new(
        network: Network,
        endpoints: Vec<Arc<dyn TransactionSource>>,
        endpoint_timeout: Duration,
    ) -> Self {
        Self {
            network,
            endpoints,
            endpoint_timeout,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Fetch a transaction, falling over to later endpoints on failure.
    pub async fn fetch(&self, signature: &TxSignature) -> Result<Fetched, RpcError> {
        if self.endpoints.is_empty() {
            return Err(RpcError::NoEndpoints(self.network));
        }

        let mut last_error = String::new();
        for (attempt, endpoint) in self.endpoints.iter().enumerate() {
            let outcome =
                tokio::time::timeout(self.endpoint_timeout, endpoint.get_transaction(signature))
                    .await;

            let err = match outcome {
                Ok(Ok(transaction)) => {
                    if attempt > 0 {
                        tracing::info!(
                            network = %self.network,
                            endpoint = endpoint.name(),
                            failed_attempts = attempt,
                            "fetched after failover"
                        );
                    }
                    return Ok(Fetched {
                        transaction,
                        endpoint: endpoint.name().to_string(),
                        failed_attempts: attempt,
                    });
                }
                Ok(Err(e)) => e,
                Err(_) => RpcError::Timeout {
                    endpoint: endpoint.name().to_string(),
                    timeout_ms: self.endpoint_timeout.as_millis() as u64,
                },
            };

            tracing::warn!(
                network = %self.network,
                endpoint = endpoint.name(),
                attempt = attempt + 1,
                of = self.endpoints.len(),
                error = %err,
                "RPC endpoint failed, trying next"
            );
            last_error = err.to_string();
        }

        Err(RpcError::AllEndpointsFailed {
            attempts: self.endpoints.len(),
            last: last_error,
        })
    }
}
