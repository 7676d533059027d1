//! The production strategy: fetch, resolve keys, check the signer, decode
//! burns and reconcile them against balance changes.

use async_trait::async_trait;
use burnproof_rpc::ConnectionManager;
use burnproof_types::TokenAmount;
use std::sync::Arc;
use std::time::Duration;

use crate::decoder::decode_burns;
use crate::fetcher::{check_age, fetch_confirmed, unix_now};
use crate::keys::resolve_account_keys;
use crate::method::{BurnRequest, VerificationStrategy};
use crate::metrics::VerifierMetrics;
use crate::reconcile::{balance_delta, reconcile};
use crate::signer::check_signer;
use crate::state::{StageTracker, VerificationStage};
use crate::VerifyError;

pub struct LedgerStrategy {
    connections: ConnectionManager,
    metrics: Arc<VerifierMetrics>,
    /// Oldest block time accepted. Must not exceed the replay store's TTL.
    max_tx_age: Duration,
}

impl LedgerStrategy {
    pub fn new(
        connections: ConnectionManager,
        metrics: Arc<VerifierMetrics>,
        max_tx_age: Duration,
    ) -> Self {
        Self {
            connections,
            metrics,
            max_tx_age,
        }
    }
}

#[async_trait]
impl VerificationStrategy for LedgerStrategy {
    fn name(&self) -> &str {
        "ledger"
    }

    async fn verify_burn(
        &self,
        request: &BurnRequest,
        tracker: &mut StageTracker,
    ) -> Result<TokenAmount, VerifyError> {
        let client = self.connections.client(request.network)?;
        let (tx, failed_attempts) = fetch_confirmed(client, &request.signature).await?;
        if failed_attempts > 0 {
            self.metrics.rpc_failovers_total.inc_by(failed_attempts as u64);
        }
        check_age(&tx, self.max_tx_age, unix_now())?;
        tracker.advance(VerificationStage::NetworkFetch);

        let keys = resolve_account_keys(&tx)?;
        tracker.advance(VerificationStage::KeysResolved);

        check_signer(&keys, &request.wallet)?;
        tracker.advance(VerificationStage::SignerChecked);

        let scan = decode_burns(
            &keys,
            &tx.message,
            &tx.meta,
            &request.wallet,
            &request.mint,
            request.decimals,
        )?;
        if scan.total.is_zero() {
            return Err(VerifyError::NoBurnFound);
        }
        tracker.advance(VerificationStage::InstructionsDecoded);

        let delta = balance_delta(&tx.meta, &request.wallet, &request.mint)?;
        reconcile(scan.total.raw(), delta)?;
        tracker.advance(VerificationStage::BalanceReconciled);

        tracing::debug!(
            signature = %request.signature,
            slot = tx.slot,
            burns = scan.instructions.len(),
            raw_amount = scan.total.raw(),
            delta,
            "burn reconciled"
        );
        Ok(scan.total)
    }
}
