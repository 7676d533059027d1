//! In-memory transaction sources.

use async_trait::async_trait;
use burnproof_rpc::{EncodedTransaction, RpcError, TransactionSource};
use burnproof_types::TxSignature;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A source that answers from a scripted map.
///
/// Unknown signatures answer `Ok(None)`, like a node that has never seen them.
pub struct NullTransactionSource {
    name: String,
    transactions: Mutex<HashMap<String, EncodedTransaction>>,
    calls: AtomicUsize,
}

impl NullTransactionSource {
    pub fn new() -> Self {
        Self::named("null-source")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transactions: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Script the answer for `signature`.
    pub fn with_transaction(self, signature: &TxSignature, tx: EncodedTransaction) -> Self {
        self.insert(signature, tx);
        self
    }

    pub fn insert(&self, signature: &TxSignature, tx: EncodedTransaction) {
        self.transactions
            .lock()
            .unwrap()
            .insert(signature.as_str().to_string(), tx);
    }

    /// Number of `get_transaction` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for NullTransactionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionSource for NullTransactionSource {
    async fn get_transaction(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<EncodedTransaction>, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .get(signature.as_str())
            .cloned())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A source whose every call fails with a transport error.
pub struct FailingSource {
    name: String,
    calls: AtomicUsize,
}

impl FailingSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSource for FailingSource {
    async fn get_transaction(
        &self,
        _signature: &TxSignature,
    ) -> Result<Option<EncodedTransaction>, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RpcError::Transport(format!("{} is down", self.name)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A source that sleeps before answering `Ok(None)`, to trip timeouts.
pub struct StallingSource {
    name: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl StallingSource {
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSource for StallingSource {
    async fn get_transaction(
        &self,
        _signature: &TxSignature,
    ) -> Result<Option<EncodedTransaction>, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature;

    #[tokio::test]
    async fn scripted_source_answers_and_counts() {
        let sig = signature(1);
        let source = NullTransactionSource::new()
            .with_transaction(&sig, EncodedTransaction::default());
        assert!(source.get_transaction(&sig).await.unwrap().is_some());
        assert!(source.get_transaction(&signature(2)).await.unwrap().is_none());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn failing_source_always_errors() {
        let source = FailingSource::new("down");
        assert!(source.get_transaction(&signature(1)).await.is_err());
        assert_eq!(source.calls(), 1);
    }
}
