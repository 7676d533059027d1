//! Fundamental types for the burn verification service.
//!
//! This crate defines the types shared by every other crate in the workspace:
//! ledger public keys, transaction signatures, networks, deployment modes,
//! token amounts, protocol constants, and the verification result returned
//! across the service boundary.

pub mod address;
pub mod amount;
pub mod error;
pub mod mode;
pub mod network;
pub mod program;
pub mod result;
pub mod signature;

pub use address::Pubkey;
pub use amount::TokenAmount;
pub use error::TypesError;
pub use mode::DeploymentMode;
pub use network::Network;
pub use program::{
    is_token_program, BURN_CHECKED_OPCODE, BURN_OPCODE, TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use result::{RejectReason, VerificationResult};
pub use signature::TxSignature;
