//! Burn verifier: validates the request, runs the configured strategy under
//! an overall deadline, converts the amount to display units and consumes
//! the signature.

use burnproof_types::{Network, Pubkey, TxSignature, VerificationResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{ConfigError, VerifierConfig};
use crate::method::{select_strategy, BurnRequest, VerificationStrategy};
use crate::metrics::VerifierMetrics;
use crate::registry::MintRegistry;
use crate::replay::{ReplayGuard, CLOCK_SKEW_ALLOWANCE};
use crate::state::{StageTracker, VerificationStage};
use crate::VerifyError;
use burnproof_rpc::ConnectionManager;

pub struct BurnVerifier {
    strategy: Arc<dyn VerificationStrategy>,
    replay: ReplayGuard,
    mints: MintRegistry,
    request_timeout: Duration,
    metrics: Arc<VerifierMetrics>,
}

impl BurnVerifier {
    pub fn new(
        strategy: Arc<dyn VerificationStrategy>,
        replay: ReplayGuard,
        mints: MintRegistry,
        request_timeout: Duration,
    ) -> Self {
        Self {
            strategy,
            replay,
            mints,
            request_timeout,
            metrics: Arc::new(VerifierMetrics::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<VerifierMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Build a verifier with HTTP endpoints, an in-memory replay store and
    /// the strategy the deployment mode selects.
    pub fn from_config(config: &VerifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let metrics = Arc::new(VerifierMetrics::new());
        let connections = ConnectionManager::from_urls(
            config
                .networks
                .iter()
                .map(|(network, net)| (network, net.effective_endpoints(network))),
            config.endpoint_timeout(),
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let strategy = select_strategy(
            config.deployment,
            connections,
            metrics.clone(),
            config.replay_ttl(),
        );
        tracing::info!(
            deployment = config.deployment.as_str(),
            strategy = strategy.name(),
            "burn verifier configured"
        );
        Ok(Self {
            strategy,
            replay: ReplayGuard::in_memory(
                config.replay_capacity,
                config.replay_ttl() + CLOCK_SKEW_ALLOWANCE,
            ),
            mints: MintRegistry::from_config(config),
            request_timeout: config.request_timeout(),
            metrics,
        })
    }

    pub fn metrics(&self) -> &Arc<VerifierMetrics> {
        &self.metrics
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Verify that `wallet` burned tokens in transaction `signature` on
    /// `network`. Never fails: every problem becomes a rejected result.
    pub async fn verify(&self, signature: &str, wallet: &str, network: Network) -> VerificationResult {
        let started = Instant::now();
        let mut tracker = StageTracker::new();
        let outcome = tokio::time::timeout(
            self.request_timeout,
            self.run(signature, wallet, network, &mut tracker),
        )
        .await;
        let outcome = outcome.unwrap_or_else(|_| {
            Err(VerifyError::Timeout(self.request_timeout.as_millis() as u64))
        });

        let result = match outcome {
            Ok(units) => {
                tracing::info!(signature, %network, units, "burn verified");
                VerificationResult::valid(network, units)
            }
            Err(e) => {
                let reason = e.reason();
                tracing::warn!(
                    signature,
                    %network,
                    stage = %tracker.current(),
                    reason = reason.as_str(),
                    error = %e,
                    "burn verification rejected"
                );
                match e.public_detail() {
                    Some(detail) => VerificationResult::rejected_with(network, reason, &detail),
                    None => VerificationResult::rejected(network, reason),
                }
            }
        };

        let label = result.code().map_or("valid", |code| code.as_str());
        self.metrics.record(
            network.as_str(),
            label,
            started.elapsed().as_secs_f64() * 1000.0,
        );
        result
    }

    async fn run(
        &self,
        signature: &str,
        wallet: &str,
        network: Network,
        tracker: &mut StageTracker,
    ) -> Result<u64, VerifyError> {
        let signature = TxSignature::parse(signature).map_err(|_| VerifyError::InvalidFormat)?;
        let wallet = Pubkey::parse(wallet).map_err(|e| VerifyError::InvalidWallet(e.to_string()))?;
        tracker.advance(VerificationStage::FormatValidated);

        let profile = self
            .mints
            .profile(network)
            .ok_or(VerifyError::NetworkNotConfigured(network))?;

        // Spare the ledger round trip for a signature already paid out.
        self.replay.check(&signature).await?;

        let request = BurnRequest {
            signature,
            wallet,
            network,
            mint: profile.mint,
            decimals: profile.decimals,
        };
        let amount = self.strategy.verify_burn(&request, tracker).await?;
        let units = amount.display_units();
        if units == 0 {
            return Err(VerifyError::BelowOneUnit(amount));
        }

        self.replay.consume(&request.signature).await?;
        tracker.advance(VerificationStage::ReplayChecked);
        Ok(units)
    }
}
