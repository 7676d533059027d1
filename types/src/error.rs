//! Top-level error type for parsing the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid transaction signature format")]
    InvalidSignatureFormat,

    #[error("invalid public key: {0}")]
    InvalidAddress(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}
