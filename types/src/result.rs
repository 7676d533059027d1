//! The verification result returned across the service boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Network;

/// Failure taxonomy. Every rejection carries exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    InvalidFormat,
    NotFound,
    OnChainFailure,
    Unauthorized,
    NoBurnFound,
    AmountMismatch,
    ReplayDetected,
    RpcUnavailable,
}

impl RejectReason {
    pub const ALL: [RejectReason; 8] = [
        Self::InvalidFormat,
        Self::NotFound,
        Self::OnChainFailure,
        Self::Unauthorized,
        Self::NoBurnFound,
        Self::AmountMismatch,
        Self::ReplayDetected,
        Self::RpcUnavailable,
    ];

    /// Stable machine-readable code (also used as a metrics label).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "InvalidFormat",
            Self::NotFound => "NotFound",
            Self::OnChainFailure => "OnChainFailure",
            Self::Unauthorized => "Unauthorized",
            Self::NoBurnFound => "NoBurnFound",
            Self::AmountMismatch => "AmountMismatch",
            Self::ReplayDetected => "ReplayDetected",
            Self::RpcUnavailable => "RpcUnavailable",
        }
    }

    /// Human-readable message shown to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "Invalid transaction signature format",
            Self::NotFound => "Transaction not found",
            Self::OnChainFailure => "Transaction failed on blockchain",
            Self::Unauthorized => "Wallet not authorized: not a signer of this transaction",
            Self::NoBurnFound => "No valid burn instruction found for this wallet and mint",
            Self::AmountMismatch => "Burn amount verification failed",
            Self::ReplayDetected => "Transaction signature already used",
            Self::RpcUnavailable => "Ledger RPC unavailable",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one verification call.
///
/// `is_valid == true` implies `burn_amount > 0` and `error`/`code` are absent;
/// the constructors are the only way to build one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    is_valid: bool,
    burn_amount: u64,
    network: Network,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<RejectReason>,
}

impl VerificationResult {
    /// A successful verification. A zero amount is downgraded to `NoBurnFound`.
    pub fn valid(network: Network, burn_amount: u64) -> Self {
        if burn_amount == 0 {
            return Self::rejected(network, RejectReason::NoBurnFound);
        }
        Self {
            is_valid: true,
            burn_amount,
            network,
            error: None,
            code: None,
        }
    }

    pub fn rejected(network: Network, reason: RejectReason) -> Self {
        Self {
            is_valid: false,
            burn_amount: 0,
            network,
            error: Some(reason.message().to_string()),
            code: Some(reason),
        }
    }

    /// A rejection whose message carries extra context after the fixed text.
    pub fn rejected_with(network: Network, reason: RejectReason, detail: &str) -> Self {
        let mut result = Self::rejected(network, reason);
        result.error = Some(format!("{}: {detail}", reason.message()));
        result
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn burn_amount(&self) -> u64 {
        self.burn_amount
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn code(&self) -> Option<RejectReason> {
        self.code
    }
}
