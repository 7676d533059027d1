//! Replay guard: a signature pays out at most once.
//!
//! The in-memory store is a bounded FIFO of consumed signatures. Entries
//! leave only once older than the TTL; the ledger strategy refuses
//! transactions older than that window, so a forgotten signature can never
//! pay again. A store full of live entries refuses new signatures rather
//! than evicting one. `try_consume` is the single atomic check-and-insert
//! every successful verification goes through, so two concurrent calls for
//! the same signature cannot both succeed.

use async_trait::async_trait;
use burnproof_types::TxSignature;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::VerifyError;

#[derive(Debug, Error)]
pub enum ReplayStoreError {
    #[error("replay store unavailable: {0}")]
    Unavailable(String),

    #[error("replay store full: {capacity} unexpired signatures")]
    Full { capacity: usize },
}

/// Extra time entries are kept beyond the transaction age window, covering
/// drift between ledger block time and the local clock.
pub const CLOCK_SKEW_ALLOWANCE: Duration = Duration::from_secs(3600);

/// Persistence seam for consumed signatures.
#[async_trait]
pub trait ReplayStore: Send + Sync {
    /// Whether `signature` has already been consumed.
    async fn is_consumed(&self, signature: &TxSignature) -> Result<bool, ReplayStoreError>;

    /// Record `signature` as consumed. Returns `false` if it already was.
    async fn try_consume(&self, signature: &TxSignature) -> Result<bool, ReplayStoreError>;

    fn name(&self) -> &str;
}

struct Inner {
    consumed: HashMap<TxSignature, Instant>,
    order: VecDeque<TxSignature>,
}

pub struct MemoryReplayStore {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

impl MemoryReplayStore {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                consumed: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().consumed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_consumed_at(&self, signature: &TxSignature, now: Instant) -> bool {
        let mut inner = self.lock();
        self.expire(&mut inner, now);
        inner.consumed.contains_key(signature)
    }

    pub fn try_consume_at(
        &self,
        signature: &TxSignature,
        now: Instant,
    ) -> Result<bool, ReplayStoreError> {
        let mut inner = self.lock();
        self.expire(&mut inner, now);
        if inner.consumed.contains_key(signature) {
            return Ok(false);
        }
        if inner.order.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, "replay store full, refusing signature");
            return Err(ReplayStoreError::Full {
                capacity: self.capacity,
            });
        }
        inner.consumed.insert(signature.clone(), now);
        inner.order.push_back(signature.clone());
        Ok(true)
    }

    /// Drop entries older than the TTL. Insertion order is time order, so
    /// only the front needs checking.
    fn expire(&self, inner: &mut Inner, now: Instant) {
        while let Some(oldest) = inner.order.front() {
            let expired = inner
                .consumed
                .get(oldest)
                .map_or(true, |at| now.saturating_duration_since(*at) >= self.ttl);
            if !expired {
                break;
            }
            if let Some(sig) = inner.order.pop_front() {
                inner.consumed.remove(&sig);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ReplayStore for MemoryReplayStore {
    async fn is_consumed(&self, signature: &TxSignature) -> Result<bool, ReplayStoreError> {
        Ok(self.is_consumed_at(signature, Instant::now()))
    }

    async fn try_consume(&self, signature: &TxSignature) -> Result<bool, ReplayStoreError> {
        self.try_consume_at(signature, Instant::now())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Verification-facing wrapper around a [`ReplayStore`].
#[derive(Clone)]
pub struct ReplayGuard {
    store: Arc<dyn ReplayStore>,
}

impl ReplayGuard {
    pub fn new(store: Arc<dyn ReplayStore>) -> Self {
        Self { store }
    }

    pub fn in_memory(capacity: usize, ttl: Duration) -> Self {
        Self::new(Arc::new(MemoryReplayStore::new(capacity, ttl)))
    }

    /// Early rejection of a signature that is already consumed. Not a
    /// substitute for [`Self::consume`].
    pub async fn check(&self, signature: &TxSignature) -> Result<(), VerifyError> {
        match self.store.is_consumed(signature).await {
            Ok(false) => Ok(()),
            Ok(true) => Err(VerifyError::ReplayDetected),
            Err(e) => Err(VerifyError::ReplayStore(e.to_string())),
        }
    }

    /// Atomically claim `signature`.
    pub async fn consume(&self, signature: &TxSignature) -> Result<(), VerifyError> {
        match self.store.try_consume(signature).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(VerifyError::ReplayDetected),
            Err(e) => Err(VerifyError::ReplayStore(e.to_string())),
        }
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnproof_nullables::signature;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn second_consume_fails() {
        let store = MemoryReplayStore::new(10, HOUR);
        let now = Instant::now();
        assert!(store.try_consume_at(&signature(1), now).unwrap());
        assert!(!store.try_consume_at(&signature(1), now).unwrap());
        assert!(store.is_consumed_at(&signature(1), now));
        assert!(!store.is_consumed_at(&signature(2), now));
    }

    #[test]
    fn entries_expire_after_ttl() {
        let store = MemoryReplayStore::new(10, HOUR);
        let t0 = Instant::now();
        assert!(store.try_consume_at(&signature(1), t0).unwrap());
        assert!(store.is_consumed_at(&signature(1), t0 + HOUR - Duration::from_secs(1)));
        assert!(!store.is_consumed_at(&signature(1), t0 + HOUR));
        assert!(store.is_empty());
    }

    #[test]
    fn full_store_refuses_instead_of_evicting() {
        let store = MemoryReplayStore::new(2, HOUR);
        let now = Instant::now();
        assert!(store.try_consume_at(&signature(1), now).unwrap());
        assert!(store.try_consume_at(&signature(2), now).unwrap());
        assert!(matches!(
            store.try_consume_at(&signature(3), now),
            Err(ReplayStoreError::Full { capacity: 2 })
        ));
        assert_eq!(store.len(), 2);
        assert!(store.is_consumed_at(&signature(1), now));
        assert!(!store.try_consume_at(&signature(1), now).unwrap());
    }

    #[test]
    fn expired_entries_free_capacity() {
        let store = MemoryReplayStore::new(1, HOUR);
        let t0 = Instant::now();
        assert!(store.try_consume_at(&signature(1), t0).unwrap());
        assert!(store.try_consume_at(&signature(2), t0).is_err());
        assert!(store.try_consume_at(&signature(2), t0 + HOUR).unwrap());
    }

    struct BrokenStore;

    #[async_trait]
    impl ReplayStore for BrokenStore {
        async fn is_consumed(&self, _signature: &TxSignature) -> Result<bool, ReplayStoreError> {
            Err(ReplayStoreError::Unavailable("down".into()))
        }

        async fn try_consume(&self, _signature: &TxSignature) -> Result<bool, ReplayStoreError> {
            Err(ReplayStoreError::Unavailable("down".into()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn guard_maps_outcomes() {
        let guard = ReplayGuard::in_memory(10, HOUR);
        let sig = signature(4);
        guard.check(&sig).await.unwrap();
        guard.consume(&sig).await.unwrap();
        assert!(matches!(guard.check(&sig).await, Err(VerifyError::ReplayDetected)));
        assert!(matches!(guard.consume(&sig).await, Err(VerifyError::ReplayDetected)));

        let broken = ReplayGuard::new(Arc::new(BrokenStore));
        assert!(matches!(
            broken.consume(&sig).await,
            Err(VerifyError::ReplayStore(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_consumes_admit_exactly_one() {
        let guard = ReplayGuard::in_memory(100, HOUR);
        let sig = signature(5);
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let guard = guard.clone();
                let sig = sig.clone();
                tokio::spawn(async move { guard.consume(&sig).await.is_ok() })
            })
            .collect();
        let mut admitted = 0;
        for h in handles {
            if h.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
    }
}
