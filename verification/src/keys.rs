//! Account key resolution for legacy and v0 messages.
//!
//! A legacy message lists every key statically. A v0 message lists its static
//! keys and appends keys loaded from address lookup tables: all writable
//! loaded keys first, then all readonly loaded keys. Instruction and token
//! balance indexes address this combined list.

use burnproof_rpc::wire::{TransactionMeta, TransactionVersion, UiMessage};
use burnproof_types::Pubkey;

use crate::fetcher::ConfirmedTransaction;
use crate::VerifyError;

/// The ordered key list every index in a transaction refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountKeyList {
    keys: Vec<Pubkey>,
    num_required_signatures: usize,
}

impl AccountKeyList {
    pub fn new(keys: Vec<Pubkey>, num_required_signatures: usize) -> Self {
        Self {
            keys,
            num_required_signatures,
        }
    }

    /// Key at an instruction or balance index.
    pub fn get(&self, index: u8) -> Option<&Pubkey> {
        self.keys.get(usize::from(index))
    }

    /// The leading keys whose signatures the transaction carries.
    pub fn signers(&self) -> &[Pubkey] {
        let n = self.num_required_signatures.min(self.keys.len());
        &self.keys[..n]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A message layout that can produce its full key list.
pub trait ResolveAccountKeys {
    fn resolve_keys(&self, meta: &TransactionMeta) -> Result<AccountKeyList, VerifyError>;
}

/// Flat layout: the static keys are the whole list.
pub struct LegacyMessage<'a>(pub &'a UiMessage);

/// Versioned layout: static keys followed by lookup-table keys.
pub struct VersionedMessage<'a>(pub &'a UiMessage);

impl ResolveAccountKeys for LegacyMessage<'_> {
    fn resolve_keys(&self, _meta: &TransactionMeta) -> Result<AccountKeyList, VerifyError> {
        let message = self.0;
        if message
            .address_table_lookups
            .as_ref()
            .is_some_and(|lookups| !lookups.is_empty())
        {
            return Err(VerifyError::Malformed(
                "legacy message carries address table lookups".into(),
            ));
        }
        signer_count_in_range(message, message.account_keys.len())?;
        Ok(AccountKeyList::new(
            message.account_keys.clone(),
            usize::from(message.header.num_required_signatures),
        ))
    }
}

impl ResolveAccountKeys for VersionedMessage<'_> {
    fn resolve_keys(&self, meta: &TransactionMeta) -> Result<AccountKeyList, VerifyError> {
        let message = self.0;
        let lookups = message.address_table_lookups.as_deref().unwrap_or_default();
        let expected_writable: usize = lookups.iter().map(|l| l.writable_indexes.len()).sum();
        let expected_readonly: usize = lookups.iter().map(|l| l.readonly_indexes.len()).sum();

        let (writable, readonly) = match &meta.loaded_addresses {
            Some(loaded) => (loaded.writable.as_slice(), loaded.readonly.as_slice()),
            None if expected_writable + expected_readonly == 0 => (&[][..], &[][..]),
            None => {
                return Err(VerifyError::Malformed(
                    "lookup tables referenced but no loaded addresses".into(),
                ))
            }
        };
        if writable.len() != expected_writable || readonly.len() != expected_readonly {
            return Err(VerifyError::Malformed(format!(
                "loaded addresses ({} writable, {} readonly) do not match lookups ({expected_writable}, {expected_readonly})",
                writable.len(),
                readonly.len()
            )));
        }

        let mut keys = Vec::with_capacity(message.account_keys.len() + writable.len() + readonly.len());
        keys.extend_from_slice(&message.account_keys);
        keys.extend_from_slice(writable);
        keys.extend_from_slice(readonly);
        signer_count_in_range(message, message.account_keys.len())?;
        Ok(AccountKeyList::new(
            keys,
            usize::from(message.header.num_required_signatures),
        ))
    }
}

/// Signers are always static keys.
fn signer_count_in_range(message: &UiMessage, static_len: usize) -> Result<(), VerifyError> {
    let required = usize::from(message.header.num_required_signatures);
    if required > static_len {
        return Err(VerifyError::Malformed(format!(
            "{required} required signatures but only {static_len} static keys"
        )));
    }
    Ok(())
}

/// Dispatches on the declared message version.
pub enum MessageView<'a> {
    Legacy(LegacyMessage<'a>),
    Versioned(VersionedMessage<'a>),
}

impl<'a> MessageView<'a> {
    pub fn new(version: TransactionVersion, message: &'a UiMessage) -> Self {
        match version {
            TransactionVersion::Legacy => Self::Legacy(LegacyMessage(message)),
            TransactionVersion::V0 => Self::Versioned(VersionedMessage(message)),
        }
    }
}

impl ResolveAccountKeys for MessageView<'_> {
    fn resolve_keys(&self, meta: &TransactionMeta) -> Result<AccountKeyList, VerifyError> {
        match self {
            Self::Legacy(m) => m.resolve_keys(meta),
            Self::Versioned(m) => m.resolve_keys(meta),
        }
    }
}

/// Resolve the full key list of a confirmed transaction.
pub fn resolve_account_keys(tx: &ConfirmedTransaction) -> Result<AccountKeyList, VerifyError> {
    MessageView::new(tx.version, &tx.message).resolve_keys(&tx.meta)
}
