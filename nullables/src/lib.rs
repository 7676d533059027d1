//! Nullable infrastructure for deterministic testing.
//!
//! The only external dependency of the verifier is the ledger RPC, abstracted
//! behind [`burnproof_rpc::TransactionSource`]. This crate provides
//! test-friendly implementations that:
//! - Return scripted transactions
//! - Count every call, so tests can assert that no network access happened
//! - Fail or stall on demand to exercise failover and timeouts
//!
//! plus a [`TransactionFixture`] builder for legacy and v0 envelopes.

pub mod fixture;
pub mod source;

pub use fixture::{key, signature, TransactionFixture};
pub use source::{FailingSource, NullTransactionSource, StallingSource};
