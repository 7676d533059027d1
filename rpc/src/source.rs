//! The transaction source seam.
//!
//! Everything above this trait is pure; everything below it talks to the
//! network. Tests swap in the in-memory sources from `burnproof-nullables`.

use async_trait::async_trait;
use burnproof_types::TxSignature;

use crate::{EncodedTransaction, RpcError};

/// Anything that can look up a confirmed transaction by signature.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch the transaction at "confirmed" commitment with v0 support.
    ///
    /// `Ok(None)` means the endpoint answered and does not know the
    /// signature. `Err` means the endpoint itself is unusable.
    async fn get_transaction(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<EncodedTransaction>, RpcError>;

    /// Label used in logs (usually the URL).
    fn name(&self) -> &str;
}
