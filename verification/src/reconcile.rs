//! Balance reconciliation: the decoded burn total must agree with the change
//! in the wallet's token balances.

use burnproof_rpc::wire::{TransactionMeta, UiTokenBalance};
use burnproof_types::Pubkey;

use crate::VerifyError;

/// Allowed disagreement between decoded total and balance delta, as a
/// percentage of the decoded total.
pub const TOLERANCE_PERCENT: u128 = 1;

/// Sum of positive `pre - post` differences over the wallet's accounts of
/// `mint`. A pre-balance without a post-balance (closed account) counts as
/// going to zero.
pub fn balance_delta(meta: &TransactionMeta, wallet: &Pubkey, mint: &Pubkey) -> Result<u64, VerifyError> {
    let mut delta: u64 = 0;
    for pre in meta
        .pre_token_balances
        .iter()
        .filter(|b| b.mint == *mint && b.owner.as_ref() == Some(wallet))
    {
        let before = raw_amount(pre)?;
        let after = match meta
            .post_token_balances
            .iter()
            .find(|b| b.account_index == pre.account_index && b.mint == *mint)
        {
            Some(post) => raw_amount(post)?,
            None => 0,
        };
        if let Some(diff) = before.checked_sub(after).filter(|d| *d > 0) {
            delta = delta
                .checked_add(diff)
                .ok_or_else(|| VerifyError::Malformed("balance delta overflows".into()))?;
        }
    }
    Ok(delta)
}

fn raw_amount(balance: &UiTokenBalance) -> Result<u64, VerifyError> {
    balance.ui_token_amount.raw().ok_or_else(|| {
        VerifyError::Malformed(format!(
            "token balance amount {:?} is not an integer",
            balance.ui_token_amount.amount
        ))
    })
}

/// Fail when `|decoded - delta|` exceeds one percent of `decoded`.
pub fn reconcile(decoded: u64, delta: u64) -> Result<(), VerifyError> {
    let diff = u128::from(decoded.abs_diff(delta));
    if diff * 100 > u128::from(decoded) * TOLERANCE_PERCENT {
        return Err(VerifyError::AmountMismatch { decoded, delta });
    }
    Ok(())
}
