//! Verification strategy seam.
//!
//! The deployment mode picks the strategy once at construction: production
//! always reads the ledger, development and test use the simulated strategy.

use async_trait::async_trait;
use burnproof_rpc::ConnectionManager;
use burnproof_types::{DeploymentMode, Network, Pubkey, TokenAmount, TxSignature};
use std::sync::Arc;
use std::time::Duration;

use crate::metrics::VerifierMetrics;
use crate::pipeline::LedgerStrategy;
use crate::simulated::SimulatedStrategy;
use crate::state::StageTracker;
use crate::VerifyError;

/// A parsed, network-bound verification request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurnRequest {
    pub signature: TxSignature,
    pub wallet: Pubkey,
    pub network: Network,
    pub mint: Pubkey,
    pub decimals: u8,
}

/// Produces the burned amount for a request, or why there is none.
#[async_trait]
pub trait VerificationStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn verify_burn(
        &self,
        request: &BurnRequest,
        tracker: &mut StageTracker,
    ) -> Result<TokenAmount, VerifyError>;
}

/// The strategy for `mode`. The ledger strategy refuses transactions older
/// than `max_tx_age`.
pub fn select_strategy(
    mode: DeploymentMode,
    connections: ConnectionManager,
    metrics: Arc<VerifierMetrics>,
    max_tx_age: Duration,
) -> Arc<dyn VerificationStrategy> {
    match SimulatedStrategy::new(mode) {
        Some(simulated) => {
            tracing::warn!(mode = mode.as_str(), "burn verification is SIMULATED");
            Arc::new(simulated)
        }
        None => Arc::new(LedgerStrategy::new(connections, metrics, max_tx_age)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_reads_the_ledger() {
        let metrics = Arc::new(VerifierMetrics::new());
        let age = Duration::from_secs(3600);
        let strategy = select_strategy(
            DeploymentMode::Production,
            ConnectionManager::new(),
            metrics.clone(),
            age,
        );
        assert_eq!(strategy.name(), "ledger");
        let strategy = select_strategy(DeploymentMode::Test, ConnectionManager::new(), metrics, age);
        assert_eq!(strategy.name(), "simulated");
    }
}
