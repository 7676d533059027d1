//! Transaction fetcher: turns a raw RPC answer into a confirmed, successfully
//! executed transaction, or the reason it is not one.

use burnproof_rpc::wire::{TransactionMeta, TransactionVersion, UiMessage};
use burnproof_rpc::{EncodedTransaction, FailoverClient};
use burnproof_types::TxSignature;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::VerifyError;

/// A fetched transaction that exists, has a message and meta, and did not revert.
#[derive(Clone, Debug)]
pub struct ConfirmedTransaction {
    pub version: TransactionVersion,
    pub slot: u64,
    /// Unix seconds, as reported by the ledger.
    pub block_time: Option<i64>,
    pub message: UiMessage,
    pub meta: TransactionMeta,
}

/// Fetch `signature` through the failover client and check it executed.
pub async fn fetch_confirmed(
    client: &FailoverClient,
    signature: &TxSignature,
) -> Result<(ConfirmedTransaction, usize), VerifyError> {
    let fetched = client.fetch(signature).await?;
    tracing::debug!(
        signature = %signature,
        endpoint = %fetched.endpoint,
        found = fetched.transaction.is_some(),
        "transaction fetched"
    );
    let tx = fetched
        .transaction
        .ok_or(VerifyError::NotFound("no transaction for signature"))?;
    Ok((confirm(tx)?, fetched.failed_attempts))
}

/// Check an envelope is complete and executed without error.
pub fn confirm(tx: EncodedTransaction) -> Result<ConfirmedTransaction, VerifyError> {
    let message = tx
        .transaction
        .and_then(|t| t.message)
        .ok_or(VerifyError::NotFound("transaction has no message"))?;
    let meta = tx
        .meta
        .ok_or(VerifyError::NotFound("transaction has no meta"))?;

    if let Some(err) = &meta.err {
        return Err(VerifyError::OnChainFailure(err.to_string()));
    }

    Ok(ConfirmedTransaction {
        version: tx.version.unwrap_or(TransactionVersion::Legacy),
        slot: tx.slot,
        block_time: tx.block_time,
        message,
        meta,
    })
}

/// Reject a transaction the replay store may already have forgotten: one
/// with no block time, or one at least `max_age` older than `now_unix`.
pub fn check_age(
    tx: &ConfirmedTransaction,
    max_age: Duration,
    now_unix: i64,
) -> Result<(), VerifyError> {
    let block_time = tx
        .block_time
        .ok_or(VerifyError::NotFound("transaction has no block time"))?;
    let max_age_secs = max_age.as_secs();
    let age = now_unix.saturating_sub(block_time);
    if age >= 0 && age as u64 >= max_age_secs {
        return Err(VerifyError::OutsideReplayWindow {
            block_time,
            max_age_secs,
        });
    }
    Ok(())
}

/// Seconds since the Unix epoch on the local clock.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
