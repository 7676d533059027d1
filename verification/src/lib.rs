//! Burn transaction verification.
//!
//! Answers one question: did this wallet destroy tokens of the configured
//! mint in this transaction, and how many? The production path:
//!
//! 1. Validate the signature and wallet formats
//! 2. Fetch the confirmed transaction, failing over across endpoints
//! 3. Resolve the account key list (legacy or v0 with lookup tables)
//! 4. Require the wallet to be a signer
//! 5. Decode and sum token-program burns from the wallet's accounts
//! 6. Reconcile the sum against the wallet's balance changes
//! 7. Consume the signature so it pays out once
//!
//! Development and test deployments substitute a deterministic simulated
//! amount for steps 2–6; production never does.

pub mod config;
pub mod decoder;
pub mod error;
pub mod fetcher;
pub mod keys;
pub mod method;
pub mod metrics;
pub mod orchestrator;
pub mod pipeline;
pub mod reconcile;
pub mod registry;
pub mod replay;
pub mod signer;
pub mod simulated;
pub mod state;

pub use config::{ConfigError, NetworkConfig, VerifierConfig};
pub use error::VerifyError;
pub use method::{select_strategy, BurnRequest, VerificationStrategy};
pub use metrics::VerifierMetrics;
pub use orchestrator::BurnVerifier;
pub use registry::MintRegistry;
pub use replay::{
    MemoryReplayStore, ReplayGuard, ReplayStore, ReplayStoreError, CLOCK_SKEW_ALLOWANCE,
};
pub use state::{StageTracker, VerificationStage};
