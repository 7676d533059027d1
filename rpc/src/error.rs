//! RPC error types.

use burnproof_types::Network;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("endpoint {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    #[error("endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("node error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no RPC endpoints configured for {0}")]
    NoEndpoints(Network),

    #[error("all {attempts} endpoints failed, last error: {last}")]
    AllEndpointsFailed { attempts: usize, last: String },
}
