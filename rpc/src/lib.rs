//! JSON-RPC client for the ledger.
//!
//! Provides:
//! - Wire types for the `getTransaction` response (legacy and v0 messages)
//! - The [`TransactionSource`] seam and its reqwest-backed implementation
//! - Ordered failover across endpoints with per-endpoint timeouts
//! - A per-network connection manager

pub mod error;
pub mod failover;
pub mod http;
pub mod manager;
pub mod source;
pub mod wire;

pub use error::RpcError;
pub use failover::{FailoverClient, Fetched};
pub use http::HttpRpcEndpoint;
pub use manager::ConnectionManager;
pub use source::TransactionSource;
pub use wire::EncodedTransaction;
