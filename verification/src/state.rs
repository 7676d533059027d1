//! Verification stage tracking.
//!
//! A verification moves strictly forward through these stages. The last
//! stage reached is logged when a verification is rejected, so operators can
//! see how far it got.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VerificationStage {
    Received,
    FormatValidated,
    /// Development/test shortcut; no ledger stages follow.
    Simulated,
    NetworkFetch,
    KeysResolved,
    SignerChecked,
    InstructionsDecoded,
    BalanceReconciled,
    ReplayChecked,
}

impl VerificationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::FormatValidated => "format_validated",
            Self::Simulated => "simulated",
            Self::NetworkFetch => "network_fetch",
            Self::KeysResolved => "keys_resolved",
            Self::SignerChecked => "signer_checked",
            Self::InstructionsDecoded => "instructions_decoded",
            Self::BalanceReconciled => "balance_reconciled",
            Self::ReplayChecked => "replay_checked",
        }
    }
}

impl fmt::Display for VerificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records the furthest stage a verification completed.
#[derive(Clone, Debug)]
pub struct StageTracker {
    current: VerificationStage,
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            current: VerificationStage::Received,
        }
    }

    /// Move to `stage`. Moving backwards is ignored.
    pub fn advance(&mut self, stage: VerificationStage) {
        if stage > self.current {
            self.current = stage;
        } else if stage < self.current {
            tracing::debug!(from = %self.current, to = %stage, "ignoring backwards stage transition");
        }
    }

    pub fn current(&self) -> VerificationStage {
        self.current
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}
