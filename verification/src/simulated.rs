//! Deterministic simulated burns for development and test deployments.

use async_trait::async_trait;
use burnproof_types::{amount::unit_scale, DeploymentMode, TokenAmount};
use sha2::{Digest, Sha256};

use crate::method::{BurnRequest, VerificationStrategy};
use crate::state::{StageTracker, VerificationStage};
use crate::VerifyError;

/// Characters of the signature's tail that seed the amount.
const SEED_CHARS: usize = 8;

/// Simulated amounts range over `1..=MAX_SIMULATED_UNITS` display units.
pub const MAX_SIMULATED_UNITS: u64 = 1000;

pub struct SimulatedStrategy {
    _private: (),
}

impl SimulatedStrategy {
    /// `None` unless `mode` allows simulation.
    pub fn new(mode: DeploymentMode) -> Option<Self> {
        mode.allows_simulation().then_some(Self { _private: () })
    }

    /// Whole display units derived from the signature; never zero.
    pub fn units_for(request: &BurnRequest) -> u64 {
        let digest = Sha256::digest(request.signature.tail(SEED_CHARS).as_bytes());
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest[..8]);
        1 + u64::from_le_bytes(seed) % MAX_SIMULATED_UNITS
    }
}

#[async_trait]
impl VerificationStrategy for SimulatedStrategy {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn verify_burn(
        &self,
        request: &BurnRequest,
        tracker: &mut StageTracker,
    ) -> Result<TokenAmount, VerifyError> {
        let units = Self::units_for(request);
        let raw = unit_scale(request.decimals)
            .and_then(|scale| units.checked_mul(scale))
            .ok_or_else(|| {
                VerifyError::Malformed(format!("decimals {} out of range", request.decimals))
            })?;
        tracker.advance(VerificationStage::Simulated);
        tracing::debug!(signature = %request.signature, units, "simulated burn");
        Ok(TokenAmount::new(raw, request.decimals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnproof_nullables::{key, signature};
    use burnproof_types::Network;

    fn request(seed: u8) -> BurnRequest {
        BurnRequest {
            signature: signature(seed),
            wallet: key(1),
            network: Network::Devnet,
            mint: key(2),
            decimals: 6,
        }
    }

    #[test]
    fn production_cannot_simulate() {
        assert!(SimulatedStrategy::new(DeploymentMode::Production).is_none());
        assert!(SimulatedStrategy::new(DeploymentMode::Development).is_some());
    }

    #[tokio::test]
    async fn amount_is_deterministic_and_in_range() {
        let strategy = SimulatedStrategy::new(DeploymentMode::Test).unwrap();
        let mut tracker = StageTracker::new();
        let a = strategy.verify_burn(&request(3), &mut tracker).await.unwrap();
        let b = strategy.verify_burn(&request(3), &mut tracker).await.unwrap();
        assert_eq!(a, b);
        assert!((1..=MAX_SIMULATED_UNITS).contains(&a.display_units()));
        assert_eq!(a.raw() % 1_000_000, 0);
        assert_eq!(tracker.current(), VerificationStage::Simulated);
    }
}
