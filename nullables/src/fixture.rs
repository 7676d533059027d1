//! Builder for `getTransaction` envelopes.
//!
//! Accounts are referenced by [`Pubkey`] while building; indexes into the
//! final key list are only assigned in [`TransactionFixture::build`], so keys
//! can be added in any order. Key order in the built message is: signers,
//! writable static keys, readonly static keys, then (v0 only) lookup-table
//! writable keys followed by lookup-table readonly keys.

use burnproof_rpc::wire::{
    MessageHeader, TransactionMeta, TransactionVersion, UiAddressTableLookup, UiCompiledInstruction,
    UiInnerInstructions, UiLoadedAddresses, UiMessage, UiTokenAmount, UiTokenBalance,
    UiTransaction,
};
use burnproof_rpc::EncodedTransaction;
use burnproof_types::{Pubkey, TxSignature, BURN_CHECKED_OPCODE, BURN_OPCODE, TOKEN_PROGRAM_ID};
use std::time::{SystemTime, UNIX_EPOCH};

/// A deterministic public key derived from a seed byte.
pub fn key(seed: u8) -> Pubkey {
    let mut bytes = [seed; 32];
    bytes[31] = 0xB5;
    Pubkey::new_from_array(bytes)
}

/// A deterministic, well-formed transaction signature.
pub fn signature(seed: u8) -> TxSignature {
    let mut bytes = [seed.wrapping_add(1); 64];
    bytes[0] = 0xF0;
    TxSignature::parse(&bs58::encode(bytes).into_string())
        .expect("64 encoded bytes are a valid signature")
}

/// Payload of a token-program `Burn`.
pub fn burn_data(amount: u64) -> Vec<u8> {
    let mut data = vec![BURN_OPCODE];
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

/// Payload of a token-program `BurnChecked`.
pub fn burn_checked_data(amount: u64, decimals: u8) -> Vec<u8> {
    let mut data = vec![BURN_CHECKED_OPCODE];
    data.extend_from_slice(&amount.to_le_bytes());
    data.push(decimals);
    data
}

struct Instruction {
    program: Pubkey,
    accounts: Vec<Pubkey>,
    data: Vec<u8>,
}

struct Balance {
    account: Pubkey,
    mint: Pubkey,
    owner: Pubkey,
    decimals: u8,
    raw: u64,
}
fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Where a key lives in the built message.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Signer,
    Writable,
    Readonly,
    LoadedWritable,
    LoadedReadonly,
}

pub struct TransactionFixture {
    version: TransactionVersion,
    keys: Vec<(Pubkey, Slot)>,
    instructions: Vec<Instruction>,
    inner: Vec<(u8, Instruction)>,
    pre: Vec<Balance>,
    post: Vec<Balance>,
    err: Option<serde_json::Value>,
    with_meta: bool,
    with_message: bool,
    block_time: Option<i64>,
}

impl TransactionFixture {
    /// A legacy transaction paid for (and signed) by `fee_payer`.
    pub fn legacy(fee_payer: Pubkey) -> Self {
        Self::new(TransactionVersion::Legacy, fee_payer)
    }

    /// A v0 transaction paid for (and signed) by `fee_payer`.
    pub fn v0(fee_payer: Pubkey) -> Self {
        Self::new(TransactionVersion::V0, fee_payer)
    }

    fn new(version: TransactionVersion, fee_payer: Pubkey) -> Self {
        Self {
            version,
            keys: vec![(fee_payer, Slot::Signer)],
            instructions: Vec::new(),
            inner: Vec::new(),
            pre: Vec::new(),
            post: Vec::new(),
            err: None,
            with_meta: true,
            with_message: true,
            block_time: Some(now_unix()),
        }
    }

    /// Add another required signer.
    pub fn with_signer(mut self, signer: Pubkey) -> Self {
        self.ensure(signer, Slot::Signer);
        self
    }

    /// Add a token account as a static writable key, with its pre-balance and
    /// (unless `post` is `None`, i.e. the account was closed) post-balance.
    pub fn with_token_account(
        self,
        account: Pubkey,
        mint: Pubkey,
        owner: Pubkey,
        decimals: u8,
        pre: u64,
        post: Option<u64>,
    ) -> Self {
        self.token_account(Slot::Writable, account, mint, owner, decimals, pre, post)
    }

    /// Like [`Self::with_token_account`], but the account is loaded through an
    /// address lookup table (v0 only).
    pub fn with_loaded_token_account(
        self,
        account: Pubkey,
        mint: Pubkey,
        owner: Pubkey,
        decimals: u8,
        pre: u64,
        post: Option<u64>,
    ) -> Self {
        assert_eq!(self.version, TransactionVersion::V0, "lookup tables need v0");
        self.token_account(Slot::LoadedWritable, account, mint, owner, decimals, pre, post)
    }

    /// Add a readonly key through an address lookup table (v0 only).
    pub fn with_loaded_readonly(mut self, key: Pubkey) -> Self {
        assert_eq!(self.version, TransactionVersion::V0, "lookup tables need v0");
        self.ensure(key, Slot::LoadedReadonly);
        self
    }

    #[allow(clippy::too_many_arguments)]
    fn token_account(
        mut self,
        slot: Slot,
        account: Pubkey,
        mint: Pubkey,
        owner: Pubkey,
        decimals: u8,
        pre: u64,
        post: Option<u64>,
    ) -> Self {
        self.ensure(account, slot);
        self.pre.push(Balance {
            account,
            mint,
            owner,
            decimals,
            raw: pre,
        });
        if let Some(raw) = post {
            self.post.push(Balance {
                account,
                mint,
                owner,
                decimals,
                raw,
            });
        }
        self
    }

    /// A top-level token-program `Burn` of `amount` raw units from `account`.
    pub fn with_burn(self, account: Pubkey, mint: Pubkey, authority: Pubkey, amount: u64) -> Self {
        self.with_instruction(TOKEN_PROGRAM_ID, vec![account, mint, authority], burn_data(amount))
    }

    /// A top-level token-program `BurnChecked`.
    pub fn with_burn_checked(
        self,
        account: Pubkey,
        mint: Pubkey,
        authority: Pubkey,
        amount: u64,
        decimals: u8,
    ) -> Self {
        self.with_instruction(
            TOKEN_PROGRAM_ID,
            vec![account, mint, authority],
            burn_checked_data(amount, decimals),
        )
    }

    /// A `Burn` issued by cross-program invocation from top-level instruction
    /// `parent`.
    pub fn with_inner_burn(
        mut self,
        parent: u8,
        account: Pubkey,
        mint: Pubkey,
        authority: Pubkey,
        amount: u64,
    ) -> Self {
        let accounts = vec![account, mint, authority];
        self.reference(TOKEN_PROGRAM_ID, &accounts);
        self.inner.push((
            parent,
            Instruction {
                program: TOKEN_PROGRAM_ID,
                accounts,
                data: burn_data(amount),
            },
        ));
        self
    }

    /// An arbitrary top-level instruction.
    pub fn with_instruction(mut self, program: Pubkey, accounts: Vec<Pubkey>, data: Vec<u8>) -> Self {
        self.reference(program, &accounts);
        self.instructions.push(Instruction {
            program,
            accounts,
            data,
        });
        self
    }

    /// Mark the transaction as executed-and-reverted.
    pub fn with_error(mut self, err: serde_json::Value) -> Self {
        self.err = Some(err);
        self
    }

    pub fn without_meta(mut self) -> Self {
        self.with_meta = false;
        self
    }

    pub fn without_message(mut self) -> Self {
        self.with_message = false;
        self
    }

    /// Override the block time, which defaults to the moment of construction.
    pub fn with_block_time(mut self, block_time: Option<i64>) -> Self {
        self.block_time = block_time;
        self
    }

    fn ensure(&mut self, key: Pubkey, slot: Slot) {
        if !self.keys.iter().any(|(k, _)| *k == key) {
            self.keys.push((key, slot));
        }
    }

    fn reference(&mut self, program: Pubkey, accounts: &[Pubkey]) {
        self.ensure(program, Slot::Readonly);
        for account in accounts {
            self.ensure(*account, Slot::Readonly);
        }
    }

    fn ordered(&self, slot: Slot) -> Vec<Pubkey> {
        self.keys
            .iter()
            .filter(|(_, s)| *s == slot)
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn build(self) -> EncodedTransaction {
        let signers = self.ordered(Slot::Signer);
        let writable = self.ordered(Slot::Writable);
        let readonly = self.ordered(Slot::Readonly);
        let loaded_writable = self.ordered(Slot::LoadedWritable);
        let loaded_readonly = self.ordered(Slot::LoadedReadonly);

        let mut static_keys = signers.clone();
        static_keys.extend(&writable);
        static_keys.extend(&readonly);

        let mut all_keys = static_keys.clone();
        all_keys.extend(&loaded_writable);
        all_keys.extend(&loaded_readonly);

        let index_of = |key: &Pubkey| -> u8 {
            all_keys
                .iter()
                .position(|k| k == key)
                .expect("every referenced key is registered") as u8
        };

        let compile = |ix: &Instruction| UiCompiledInstruction {
            program_id_index: index_of(&ix.program),
            accounts: ix.accounts.iter().map(index_of).collect(),
            data: bs58::encode(&ix.data).into_string(),
            stack_height: None,
        };

        let balances = |list: &[Balance]| -> Vec<UiTokenBalance> {
            list.iter()
                .map(|b| UiTokenBalance {
                    account_index: index_of(&b.account),
                    mint: b.mint,
                    owner: Some(b.owner),
                    program_id: Some(TOKEN_PROGRAM_ID),
                    ui_token_amount: UiTokenAmount {
                        amount: b.raw.to_string(),
                        decimals: b.decimals,
                        ui_amount_string: None,
                    },
                })
                .collect()
        };

        let mut inner: Vec<UiInnerInstructions> = Vec::new();
        for (parent, ix) in &self.inner {
            let compiled = compile(ix);
            match inner.iter_mut().find(|group| group.index == *parent) {
                Some(group) => group.instructions.push(compiled),
                None => inner.push(UiInnerInstructions {
                    index: *parent,
                    instructions: vec![compiled],
                }),
            }
        }

        let is_v0 = self.version == TransactionVersion::V0;
        let address_table_lookups = is_v0.then(|| {
            if loaded_writable.is_empty() && loaded_readonly.is_empty() {
                Vec::new()
            } else {
                vec![UiAddressTableLookup {
                    account_key: key(0xEE),
                    writable_indexes: (0..loaded_writable.len() as u8).collect(),
                    readonly_indexes: (0..loaded_readonly.len() as u8).collect(),
                }]
            }
        });

        let message = UiMessage {
            header: MessageHeader {
                num_required_signatures: signers.len() as u8,
                num_readonly_signed_accounts: 0,
                num_readonly_unsigned_accounts: readonly.len() as u8,
            },
            account_keys: static_keys,
            recent_blockhash: key(0xBB).to_string(),
            instructions: self.instructions.iter().map(compile).collect(),
            address_table_lookups,
        };

        let meta = TransactionMeta {
            err: self.err.clone(),
            fee: 5000,
            pre_token_balances: balances(&self.pre),
            post_token_balances: balances(&self.post),
            inner_instructions: inner,
            loaded_addresses: is_v0.then(|| UiLoadedAddresses {
                writable: loaded_writable.clone(),
                readonly: loaded_readonly.clone(),
            }),
            log_messages: Vec::new(),
        };

        EncodedTransaction {
            slot: 300_000_000,
            block_time: self.block_time,
            version: Some(self.version),
            meta: self.with_meta.then_some(meta),
            transaction: Some(UiTransaction {
                signatures: vec![signature(0).to_string()],
                message: self.with_message.then_some(message),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_are_well_formed_and_distinct() {
        assert_ne!(signature(1), signature(2));
        assert!(signature(0).as_str().len() >= TxSignature::MIN_LEN);
    }

    #[test]
    fn legacy_burn_layout() {
        let wallet = key(1);
        let account = key(2);
        let mint = key(3);
        let tx = TransactionFixture::legacy(wallet)
            .with_token_account(account, mint, wallet, 6, 1_000, Some(400))
            .with_burn(account, mint, wallet, 600)
            .build();

        let message = tx.transaction.unwrap().message.unwrap();
        assert_eq!(message.account_keys[0], wallet);
        assert_eq!(message.header.num_required_signatures, 1);
        let ix = &message.instructions[0];
        assert_eq!(message.account_keys[ix.program_id_index as usize], TOKEN_PROGRAM_ID);
        assert_eq!(message.account_keys[ix.accounts[0] as usize], account);
        assert_eq!(bs58::decode(&ix.data).into_vec().unwrap(), burn_data(600));

        let meta = tx.meta.unwrap();
        assert_eq!(meta.pre_token_balances[0].account_index, ix.accounts[0]);
        assert!(meta.loaded_addresses.is_none());
    }

    #[test]
    fn loaded_keys_follow_static_keys() {
        let wallet = key(1);
        let account = key(2);
        let mint = key(3);
        let tx = TransactionFixture::v0(wallet)
            .with_loaded_token_account(account, mint, wallet, 6, 10, Some(0))
            .with_burn(account, mint, wallet, 10)
            .build();

        let message = tx.transaction.unwrap().message.unwrap();
        let static_len = message.account_keys.len() as u8;
        assert_eq!(message.instructions[0].accounts[0], static_len);
        assert!(!message.account_keys.contains(&account));
        let meta = tx.meta.unwrap();
        assert_eq!(meta.loaded_addresses.unwrap().writable, vec![account]);
    }
}
