//! Wire types for the ledger's `getTransaction` JSON-RPC method
//! (`encoding: "json"`).
//!
//! Public keys are decoded straight into [`Pubkey`] so a response carrying a
//! malformed key fails deserialization and is treated as a bad endpoint
//! answer. Fields the verifier does not read are left out; unknown fields are
//! ignored.

use burnproof_types::{Pubkey, TxSignature};
use serde::{Deserialize, Serialize};

// ── Request ─────────────────────────────────────────────────────────────

/// Commitment level requested for every fetch.
pub const COMMITMENT: &str = "confirmed";

/// Highest transaction version this client understands.
pub const MAX_SUPPORTED_TRANSACTION_VERSION: u8 = 0;

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: (&'a str, GetTransactionConfig),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionConfig {
    pub encoding: &'static str,
    pub commitment: &'static str,
    pub max_supported_transaction_version: u8,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn get_transaction(signature: &'a TxSignature) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 1,
            method: "getTransaction",
            params: (
                signature.as_str(),
                GetTransactionConfig {
                    encoding: "json",
                    commitment: COMMITMENT,
                    max_supported_transaction_version: MAX_SUPPORTED_TRANSACTION_VERSION,
                },
            ),
        }
    }
}

// ── Response envelope ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

// ── Transaction ─────────────────────────────────────────────────────────

/// A confirmed transaction as returned by `getTransaction`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedTransaction {
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    /// Absent on nodes queried without `maxSupportedTransactionVersion`;
    /// treated as legacy.
    #[serde(default)]
    pub version: Option<TransactionVersion>,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    #[serde(default)]
    pub transaction: Option<UiTransaction>,
}

/// Declared message layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVersion", into = "RawVersion")]
pub enum TransactionVersion {
    Legacy,
    V0,
}

/// The node encodes the version as the string `"legacy"` or a number.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawVersion {
    Named(String),
    Number(u8),
}

impl TryFrom<RawVersion> for TransactionVersion {
    type Error = String;

    fn try_from(raw: RawVersion) -> Result<Self, Self::Error> {
        match raw {
            RawVersion::Named(name) if name == "legacy" => Ok(Self::Legacy),
            RawVersion::Named(name) => Err(format!("unknown transaction version {name:?}")),
            RawVersion::Number(0) => Ok(Self::V0),
            RawVersion::Number(n) => Err(format!("unsupported transaction version {n}")),
        }
    }
}

impl From<TransactionVersion> for RawVersion {
    fn from(version: TransactionVersion) -> Self {
        match version {
            TransactionVersion::Legacy => RawVersion::Named("legacy".to_string()),
            TransactionVersion::V0 => RawVersion::Number(0),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTransaction {
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub message: Option<UiMessage>,
}

/// Message body, shared by the legacy and v0 layouts. Only v0 messages
/// carry `address_table_lookups`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiMessage {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    #[serde(default)]
    pub recent_blockhash: String,
    #[serde(default)]
    pub instructions: Vec<UiCompiledInstruction>,
    #[serde(default)]
    pub address_table_lookups: Option<Vec<UiAddressTableLookup>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

/// An instruction whose program and accounts are indexes into the resolved
/// account key list. `data` is base58.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiCompiledInstruction {
    pub program_id_index: u8,
    #[serde(default)]
    pub accounts: Vec<u8>,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub stack_height: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiAddressTableLookup {
    pub account_key: Pubkey,
    #[serde(default)]
    pub writable_indexes: Vec<u8>,
    #[serde(default)]
    pub readonly_indexes: Vec<u8>,
}

// ── Meta ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    /// Non-null when the transaction executed and reverted.
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub pre_token_balances: Vec<UiTokenBalance>,
    #[serde(default)]
    pub post_token_balances: Vec<UiTokenBalance>,
    #[serde(default)]
    pub inner_instructions: Vec<UiInnerInstructions>,
    /// Keys loaded through address lookup tables (v0 only).
    #[serde(default)]
    pub loaded_addresses: Option<UiLoadedAddresses>,
    #[serde(default)]
    pub log_messages: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiLoadedAddresses {
    #[serde(default)]
    pub writable: Vec<Pubkey>,
    #[serde(default)]
    pub readonly: Vec<Pubkey>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiInnerInstructions {
    /// Index of the top-level instruction that issued these.
    pub index: u8,
    #[serde(default)]
    pub instructions: Vec<UiCompiledInstruction>,
}

/// One token account balance snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenBalance {
    pub account_index: u8,
    pub mint: Pubkey,
    #[serde(default)]
    pub owner: Option<Pubkey>,
    #[serde(default)]
    pub program_id: Option<Pubkey>,
    pub ui_token_amount: UiTokenAmount,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    /// Raw base-unit amount as a decimal string.
    pub amount: String,
    pub decimals: u8,
    #[serde(default)]
    pub ui_amount_string: Option<String>,
}

impl UiTokenAmount {
    pub fn raw(&self) -> Option<u64> {
        self.amount.parse().ok()
    }
}
