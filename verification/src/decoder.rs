//! Token-program burn instruction decoding.
//!
//! Both the top-level instructions and the instructions issued by
//! cross-program invocation are scanned. A burn qualifies only when its
//! source account is, in the pre-balance snapshot, a token account of the
//! requested mint owned by the claimed wallet.

use burnproof_rpc::wire::{TransactionMeta, UiCompiledInstruction, UiMessage};
use burnproof_types::{
    is_token_program, Pubkey, TokenAmount, BURN_CHECKED_OPCODE, BURN_OPCODE,
};

use crate::keys::AccountKeyList;
use crate::VerifyError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BurnKind {
    Burn,
    /// Carries the decimals the signer asserted for the mint.
    BurnChecked { decimals: u8 },
}

/// One decoded burn, before it is matched against the claimant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurnInstruction {
    pub program_id: Pubkey,
    pub source_account_index: u8,
    pub raw_amount: u64,
    pub kind: BurnKind,
}

/// Decode a token-program instruction as a burn. `None` for any other
/// instruction, including truncated payloads.
pub fn decode_burn(program_id: &Pubkey, accounts: &[u8], data: &[u8]) -> Option<BurnInstruction> {
    if !is_token_program(program_id) {
        return None;
    }
    let (&opcode, rest) = data.split_first()?;
    let source_account_index = *accounts.first()?;
    let amount_bytes: [u8; 8] = rest.get(..8)?.try_into().ok()?;
    let raw_amount = u64::from_le_bytes(amount_bytes);
    let kind = match opcode {
        BURN_OPCODE => BurnKind::Burn,
        BURN_CHECKED_OPCODE => BurnKind::BurnChecked {
            decimals: *rest.get(8)?,
        },
        _ => return None,
    };
    Some(BurnInstruction {
        program_id: *program_id,
        source_account_index,
        raw_amount,
        kind,
    })
}

/// Qualifying burns and their total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurnScan {
    pub instructions: Vec<BurnInstruction>,
    pub total: TokenAmount,
}

/// Sum every burn of `mint` from an account `wallet` owned before the
/// transaction executed.
pub fn decode_burns(
    keys: &AccountKeyList,
    message: &UiMessage,
    meta: &TransactionMeta,
    wallet: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
) -> Result<BurnScan, VerifyError> {
    let inner = meta
        .inner_instructions
        .iter()
        .flat_map(|group| group.instructions.iter());
    let mut scan = BurnScan {
        instructions: Vec::new(),
        total: TokenAmount::zero(decimals),
    };

    for ix in message.instructions.iter().chain(inner) {
        let Some(burn) = decode_compiled(keys, ix)? else {
            continue;
        };
        if keys.get(burn.source_account_index).is_none() {
            return Err(VerifyError::Malformed(format!(
                "burn source index {} out of range",
                burn.source_account_index
            )));
        }
        if !source_belongs_to(meta, burn.source_account_index, wallet, mint) {
            continue;
        }
        if let BurnKind::BurnChecked { decimals: asserted } = burn.kind {
            if asserted != decimals {
                tracing::debug!(asserted, decimals, "BurnChecked decimals disagree with mint");
                continue;
            }
        }
        scan.total = scan
            .total
            .checked_add(TokenAmount::new(burn.raw_amount, decimals))
            .ok_or_else(|| VerifyError::Malformed("burn total overflows".into()))?;
        scan.instructions.push(burn);
    }
    Ok(scan)
}

fn decode_compiled(
    keys: &AccountKeyList,
    ix: &UiCompiledInstruction,
) -> Result<Option<BurnInstruction>, VerifyError> {
    let program_id = keys.get(ix.program_id_index).ok_or_else(|| {
        VerifyError::Malformed(format!("program index {} out of range", ix.program_id_index))
    })?;
    if !is_token_program(program_id) {
        return Ok(None);
    }
    let data = bs58::decode(&ix.data)
        .into_vec()
        .map_err(|e| VerifyError::Malformed(format!("instruction data: {e}")))?;
    Ok(decode_burn(program_id, &ix.accounts, &data))
}

fn source_belongs_to(meta: &TransactionMeta, index: u8, wallet: &Pubkey, mint: &Pubkey) -> bool {
    meta.pre_token_balances
        .iter()
        .any(|b| b.account_index == index && b.mint == *mint && b.owner.as_ref() == Some(wallet))
}
