use burnproof_rpc::RpcError;
use burnproof_types::{Network, Pubkey, RejectReason, TokenAmount};
use thiserror::Error;

/// Why a verification did not succeed.
///
/// Several variants collapse onto the same [`RejectReason`]; the variant
/// keeps the detail for logs while the reason is what callers act on.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("invalid transaction signature format")]
    InvalidFormat,

    #[error("invalid wallet address: {0}")]
    InvalidWallet(String),

    #[error("transaction not found: {0}")]
    NotFound(&'static str),

    #[error("malformed transaction: {0}")]
    Malformed(String),

    #[error("transaction failed on chain: {0}")]
    OnChainFailure(String),

    #[error("wallet {0} is not a signer of the transaction")]
    Unauthorized(Pubkey),

    #[error("no qualifying burn instruction")]
    NoBurnFound,

    #[error("burn of {0} is below one whole token")]
    BelowOneUnit(TokenAmount),

    #[error("decoded burn {decoded} differs from balance delta {delta}")]
    AmountMismatch { decoded: u64, delta: u64 },

    #[error("signature already used")]
    ReplayDetected,

    #[error("transaction block time {block_time} is older than the {max_age_secs}s replay window")]
    OutsideReplayWindow { block_time: i64, max_age_secs: u64 },

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("verification timed out after {0}ms")]
    Timeout(u64),

    #[error("network {0} is not configured")]
    NetworkNotConfigured(Network),

    #[error("replay store error: {0}")]
    ReplayStore(String),
}

impl VerifyError {
    /// The taxonomy code reported to the caller.
    pub fn reason(&self) -> RejectReason {
        match self {
            Self::InvalidFormat | Self::InvalidWallet(_) => RejectReason::InvalidFormat,
            Self::NotFound(_) | Self::Malformed(_) => RejectReason::NotFound,
            Self::OnChainFailure(_) => RejectReason::OnChainFailure,
            Self::Unauthorized(_) => RejectReason::Unauthorized,
            Self::NoBurnFound | Self::BelowOneUnit(_) => RejectReason::NoBurnFound,
            Self::AmountMismatch { .. } => RejectReason::AmountMismatch,
            Self::ReplayDetected | Self::OutsideReplayWindow { .. } => {
                RejectReason::ReplayDetected
            }
            Self::Rpc(_)
            | Self::Timeout(_)
            | Self::NetworkNotConfigured(_)
            | Self::ReplayStore(_) => RejectReason::RpcUnavailable,
        }
    }

    /// Extra context safe to show the caller, if any.
    pub fn public_detail(&self) -> Option<String> {
        match self {
            Self::AmountMismatch { decoded, delta } => {
                Some(format!("decoded {decoded}, balance delta {delta}"))
            }
            Self::InvalidWallet(_) => Some("wallet address".to_string()),
            Self::OutsideReplayWindow { .. } => {
                Some("transaction is older than the replay window".to_string())
            }
            _ => None,
        }
    }
}
